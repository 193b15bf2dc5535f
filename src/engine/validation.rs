use crate::domain::chips::Chips;
use crate::domain::hand::HandPhase;
use crate::domain::{PlayerId, SeatIndex, Table};
use crate::engine::errors::EngineError;

/// Итоговая ставка после проверки bet/raise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidatedBet {
    /// До какой суммы вырастет ставка игрока на улице.
    pub to: Chips,
    /// Принят как короткий олл-ин (меньше минимального рейза, но почти весь стек).
    pub short_all_in: bool,
}

/// Найти место игрока и убедиться, что сейчас его ход в идущей раздаче.
pub fn locate_actor(table: &Table, player_id: PlayerId) -> Result<SeatIndex, EngineError> {
    let seat = table
        .seat_of(player_id)
        .ok_or(EngineError::PlayerNotAtTable(player_id))?;

    if table.phase != HandPhase::Betting {
        return Err(EngineError::NoActiveHand);
    }
    if table.turn != Some(seat) {
        return Err(EngineError::NotPlayersTurn(player_id));
    }

    let player = table
        .seat(seat)
        .ok_or(EngineError::PlayerNotAtTable(player_id))?;
    if !player.in_hand || player.folded {
        return Err(EngineError::NotInHand(player_id));
    }

    Ok(seat)
}

pub fn validate_check(table: &Table, seat: SeatIndex) -> Result<(), EngineError> {
    let player = table.seat(seat).ok_or(EngineError::InvalidSeat(seat))?;
    if player.bet != table.current_bet {
        return Err(EngineError::CannotCheck);
    }
    Ok(())
}

pub fn validate_call(table: &Table) -> Result<(), EngineError> {
    if table.current_bet.is_zero() {
        return Err(EngineError::CannotCall);
    }
    Ok(())
}

/// Проверка bet/raise до итоговой суммы `amount`.
///
/// Сумма меньше `min_raise_to` разрешена только как короткий олл-ин:
/// после ставки в стеке осталось бы меньше одного BB, а всего у игрока больше текущей ставки.
/// Такой олл-ин ставит весь стек.
pub fn validate_bet(table: &Table, seat: SeatIndex, amount: Chips) -> Result<ValidatedBet, EngineError> {
    if amount.is_zero() {
        return Err(EngineError::InvalidAmount(0));
    }

    let player = table.seat(seat).ok_or(EngineError::InvalidSeat(seat))?;

    let someone_can_answer = table
        .players()
        .any(|(other, p)| other != seat && p.can_act());
    if !someone_can_answer {
        return Err(EngineError::EveryoneAllIn);
    }

    let total = player.total_available();
    if amount > total {
        return Err(EngineError::NotEnoughChips {
            amount: amount.0,
            available: total.0,
        });
    }

    let short_all_in =
        total - amount < table.config.big_blind && total > table.current_bet;

    if amount < table.min_raise_to && !short_all_in {
        return Err(EngineError::RaiseTooSmall {
            amount: amount.0,
            min_raise_to: table.min_raise_to.0,
        });
    }

    let to = if short_all_in { total } else { amount };
    Ok(ValidatedBet { to, short_all_in })
}
