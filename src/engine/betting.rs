//! Раунд ставок: применение check/bet/call/fold и решение, закрылась ли улица.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::chips::Chips;
use crate::domain::hand::Street;
use crate::domain::{SeatIndex, Table, TimestampMs};
use crate::engine::actions::{ActionSource, PlayerAction, PlayerActionKind};
use crate::engine::errors::EngineError;
use crate::engine::hand_history::{HandEventKind, HandHistory};
use crate::engine::positions::{is_effective_button, next_seat_from};
use crate::engine::side_pots::{add_to_current_pot, derive_side_pots, remove_from_pots};
use crate::engine::validation::{locate_actor, validate_bet, validate_call, validate_check};

/// Что произошло со столом после действия.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Ход перешёл к следующему игроку.
    Continue,
    /// Улица закрыта, открыты новые карты, ход у первого после кнопки.
    StreetClosed,
    /// Торговля окончена: пора докладывать борд и разыгрывать банки.
    SettlementNeeded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Closure {
    Open,
    CloseStreet,
    Settle,
}

/// Применить действие игрока.
///
/// Fold без ставки и call без долга превращаются в check.
/// При ошибке стол не меняется.
pub fn apply_action(
    table: &mut Table,
    action: &PlayerAction,
    now: TimestampMs,
    history: &mut HandHistory,
) -> Result<ActionOutcome, EngineError> {
    let seat = locate_actor(table, action.player_id)?;
    let kind = normalize(table, seat, action.kind);

    match kind {
        PlayerActionKind::Check => check(table, seat, history)?,
        PlayerActionKind::Bet(amount) => bet(table, seat, amount, history)?,
        PlayerActionKind::Call => call(table, seat, history)?,
        PlayerActionKind::Fold => fold(table, seat, history)?,
    }

    if action.source == ActionSource::Manual {
        if let Some(p) = table.seat_mut(seat) {
            p.auto_action_count = 0;
        }
    }

    let closure = closure_after(table, seat, kind);
    debug!(table_id = table.id, seat, ?kind, ?closure, "action applied");

    match closure {
        Closure::Open => {
            let next = next_seat_from(table, seat);
            table.set_turn(next, now);
            Ok(ActionOutcome::Continue)
        }
        Closure::CloseStreet => close_street(table, now, history),
        Closure::Settle => {
            end_betting(table, now);
            Ok(ActionOutcome::SettlementNeeded)
        }
    }
}

fn normalize(table: &Table, seat: SeatIndex, kind: PlayerActionKind) -> PlayerActionKind {
    let owes = table
        .seat(seat)
        .map_or(false, |p| p.bet < table.current_bet);
    match kind {
        PlayerActionKind::Fold if table.current_bet.is_zero() => PlayerActionKind::Check,
        PlayerActionKind::Call if !table.current_bet.is_zero() && !owes => PlayerActionKind::Check,
        other => other,
    }
}

fn check(table: &mut Table, seat: SeatIndex, history: &mut HandHistory) -> Result<(), EngineError> {
    validate_check(table, seat)?;
    let name = display_name(table, seat);
    history.push(HandEventKind::Checked { seat, name });
    Ok(())
}

fn bet(
    table: &mut Table,
    seat: SeatIndex,
    amount: Chips,
    history: &mut HandHistory,
) -> Result<(), EngineError> {
    let validated = validate_bet(table, seat, amount)?;
    let old_bet = table.current_bet;

    let player = table.seat_mut(seat).ok_or(EngineError::InvalidSeat(seat))?;
    let paid = player.commit(validated.to - player.bet);
    let new_bet = player.bet;
    let jammed = player.all_in;
    let name = player.display_name.clone();

    add_to_current_pot(table, paid);
    table.current_bet = new_bet;
    table.min_raise_to = new_bet + (new_bet - old_bet);

    if jammed {
        history.push(HandEventKind::Jammed {
            seat,
            name,
            amount: new_bet,
        });
    } else {
        history.push(HandEventKind::Bet {
            seat,
            name,
            amount: new_bet,
        });
    }
    Ok(())
}

fn call(table: &mut Table, seat: SeatIndex, history: &mut HandHistory) -> Result<(), EngineError> {
    validate_call(table)?;
    let current_bet = table.current_bet;

    let player = table.seat_mut(seat).ok_or(EngineError::InvalidSeat(seat))?;
    let paid = player.commit(current_bet - player.bet);
    let all_in = player.all_in;
    let name = player.display_name.clone();

    add_to_current_pot(table, paid);

    if all_in {
        history.push(HandEventKind::CalledAllIn { seat, name });
    } else {
        history.push(HandEventKind::Called {
            seat,
            name,
            amount: current_bet,
        });
    }
    Ok(())
}

fn fold(table: &mut Table, seat: SeatIndex, history: &mut HandHistory) -> Result<(), EngineError> {
    let player = table.seat_mut(seat).ok_or(EngineError::InvalidSeat(seat))?;
    player.in_hand = false;
    player.folded = true;
    let name = player.display_name.clone();

    remove_from_pots(table, seat);
    history.push(HandEventKind::Folded { seat, name });
    Ok(())
}

/// Кто-то из ещё способных ходить не уравнял текущую ставку.
fn someone_owes(table: &Table) -> bool {
    table
        .players()
        .any(|(_, p)| p.can_act() && p.bet < table.current_bet)
}

fn big_blind_has_option(table: &Table) -> bool {
    table
        .big_blind_seat
        .and_then(|s| table.seat(s))
        .map_or(false, |p| p.can_act())
}

fn closure_after(table: &Table, seat: SeatIndex, kind: PlayerActionKind) -> Closure {
    if table.in_hand_count() < 2 {
        return Closure::Settle;
    }
    if table.can_act_count() < 2 && !someone_owes(table) {
        return Closure::Settle;
    }

    let preflop = table.street() == Street::Preflop;
    let next = next_seat_from(table, seat);
    let bets_matched = next
        .and_then(|s| table.seat(s))
        .map_or(true, |p| p.bet == table.current_bet);

    let closed = match kind {
        PlayerActionKind::Bet(_) => false,
        PlayerActionKind::Fold => bets_matched,
        PlayerActionKind::Call => {
            if preflop && table.current_bet == table.config.big_blind && big_blind_has_option(table)
            {
                false
            } else {
                bets_matched
            }
        }
        PlayerActionKind::Check => {
            if preflop && table.big_blind_seat == Some(seat) {
                true
            } else if table.primary_board().len() >= 3 && is_effective_button(table, seat) {
                true
            } else if preflop && !big_blind_has_option(table) {
                bets_matched
            } else {
                false
            }
        }
    };

    if closed {
        Closure::CloseStreet
    } else {
        Closure::Open
    }
}

/// Закрыть улицу: сайд-поты, обнуление ставок, новые карты, ход первому после кнопки.
fn close_street(
    table: &mut Table,
    now: TimestampMs,
    history: &mut HandHistory,
) -> Result<ActionOutcome, EngineError> {
    let to_deal = table.street().cards_on_close();
    end_betting(table, now);

    if to_deal == 0 {
        return Ok(ActionOutcome::SettlementNeeded);
    }

    for _ in 0..to_deal {
        deal_board_card(table, history)?;
    }

    let next = next_seat_from(table, table.dealer);
    if next.is_none() {
        return Ok(ActionOutcome::SettlementNeeded);
    }
    table.set_turn(next, now);
    Ok(ActionOutcome::StreetClosed)
}

/// Конец торговли на улице: сайд-поты, ставки в ноль, ход ни у кого.
fn end_betting(table: &mut Table, now: TimestampMs) {
    derive_side_pots(table);
    for (_, p) in table.players_mut() {
        p.bet = Chips::ZERO;
    }
    table.current_bet = Chips::ZERO;
    table.min_raise_to = table.config.big_blind;
    table.set_turn(None, now);
}

/// Открыть по одной карте на каждый борд (из одной и той же колоды).
pub(crate) fn deal_board_card(table: &mut Table, history: &mut HandHistory) -> Result<(), EngineError> {
    if table.community_boards.is_empty() {
        table.community_boards.push(Vec::new());
    }
    for idx in 0..table.community_boards.len() {
        let card = table
            .deck
            .draw_one()
            .ok_or(EngineError::Invariant("колода закончилась"))?;
        table.community_boards[idx].push(card);
        history.push(HandEventKind::BoardDealt {
            board: idx,
            cards: vec![card],
        });
    }
    Ok(())
}

fn display_name(table: &Table, seat: SeatIndex) -> String {
    table
        .seat(seat)
        .map(|p| p.display_name.clone())
        .unwrap_or_default()
}
