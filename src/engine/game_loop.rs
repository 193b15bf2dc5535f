//! Жизненный цикл раздачи: старт, окно run-it-twice, доклад борда, уборка.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::domain::chips::Chips;
use crate::domain::deck::Deck;
use crate::domain::hand::HandPhase;
use crate::domain::{PlayerId, SeatIndex, Table, TimestampMs};
use crate::engine::betting::{deal_board_card, ActionOutcome};
use crate::engine::errors::EngineError;
use crate::engine::hand_history::{HandEventKind, HandHistory};
use crate::engine::positions::next_seat_from;
use crate::engine::side_pots::{ante_pots, derive_side_pots};
use crate::engine::RandomSource;

/// Как начинается розыгрыш банков.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SettlementStart {
    /// В раздаче остался один игрок – банки отдаются сразу, без доклада борда.
    FoldOut,
    /// Борд не доложен: открыто окно голосования за run-it-twice.
    RunItTwiceWindow,
    /// Борд полный, сразу шоудаун.
    Showdown,
}

/// Начать новую раздачу.
///
/// Карты получают ACTIVE игроки с фишками; кнопка сдвигается на следующее такое место,
/// SB и BB – следующие за ней. Анте ставится за всех в раздаче (не больше стека),
/// затем блайнды (или олл-ин на остаток).
///
/// Возвращает `SettlementNeeded`, если после блайндов торговаться уже некому.
/// При `Err` стол нужно выбросить: он мог быть изменён частично.
pub fn new_hand<R: RandomSource>(
    table: &mut Table,
    rng: &mut R,
    now: TimestampMs,
    history: &mut HandHistory,
) -> Result<ActionOutcome, EngineError> {
    if table.hand_in_progress() {
        return Err(EngineError::HandInProgress);
    }
    let dealable = table
        .players()
        .filter(|(_, p)| p.is_active() && !p.stack.is_zero())
        .count();
    if dealable < 2 {
        return Err(EngineError::NotEnoughPlayers);
    }

    let mut deck = Deck::standard_52();
    rng.shuffle(&mut deck.cards);
    table.deck = deck;
    table.community_boards = vec![Vec::new()];
    table.pots.clear();
    table.deciding_run_it_twice = false;

    for (_, p) in table.players_mut() {
        p.reset_for_new_hand();
    }
    for idx in 0..table.seats.len() {
        let Some(player) = table.seats[idx].as_mut() else {
            continue;
        };
        if !player.is_active() || player.stack.is_zero() {
            continue;
        }
        let first = table.deck.draw_one();
        let second = table.deck.draw_one();
        let (Some(a), Some(b)) = (first, second) else {
            return Err(EngineError::Invariant("колода закончилась при раздаче"));
        };
        player.hole_cards = vec![a, b];
        player.in_hand = true;
    }

    let dealer = locate(table, table.dealer, "кнопка не найдена")?;
    let small_blind = locate(table, dealer, "малый блайнд не найден")?;
    let big_blind = locate(table, small_blind, "большой блайнд не найден")?;
    table.dealer = dealer;
    table.big_blind_seat = Some(big_blind);

    // Анте не входит в `bet`: короткие анте раскладываются по банкам здесь.
    let ante = table.config.ante;
    let mut antes: Vec<(SeatIndex, Chips)> = Vec::new();
    if !ante.is_zero() {
        for (seat, p) in table.players_mut().filter(|(_, p)| p.in_hand) {
            let paid = ante.min(p.stack);
            p.stack -= paid;
            if p.stack.is_zero() {
                p.all_in = true;
            }
            antes.push((seat, paid));
        }
    }

    let blinds = [
        (small_blind, table.config.small_blind),
        (big_blind, table.config.big_blind),
    ];
    let mut posted = Chips::ZERO;
    for (seat, amount) in blinds {
        if let Some(p) = table.seat_mut(seat) {
            posted += p.commit(amount);
        }
    }

    let eligible: Vec<SeatIndex> = table
        .players()
        .filter(|(_, p)| p.in_hand)
        .map(|(s, _)| s)
        .collect();
    let mut pots = ante_pots(&antes, ante, &eligible);
    if let Some(last) = pots.last_mut() {
        last.size += posted;
    }
    table.pots = pots;

    table.current_bet = table.config.big_blind;
    table.min_raise_to = table.config.big_blind + table.config.big_blind;
    table.phase = HandPhase::Betting;
    table.hand_no += 1;

    history.push(HandEventKind::HandStarted {
        hand_no: table.hand_no,
        dealer,
        small_blind,
        big_blind,
    });
    info!(
        table_id = table.id,
        hand_no = table.hand_no,
        dealer,
        small_blind,
        big_blind,
        "new hand"
    );

    let someone_owes = table
        .players()
        .any(|(_, p)| p.can_act() && p.bet < table.current_bet);
    let first_to_act = next_seat_from(table, big_blind);

    if first_to_act.is_none() || (table.can_act_count() < 2 && !someone_owes) {
        derive_side_pots(table);
        for (_, p) in table.players_mut() {
            p.bet = Chips::ZERO;
        }
        table.current_bet = Chips::ZERO;
        table.set_turn(None, now);
        return Ok(ActionOutcome::SettlementNeeded);
    }

    table.set_turn(first_to_act, now);
    Ok(ActionOutcome::Continue)
}

fn locate(table: &Table, from: SeatIndex, what: &'static str) -> Result<SeatIndex, EngineError> {
    next_seat_from(table, from).ok_or_else(|| {
        error!(table_id = table.id, from, what, "seat resolution failed");
        EngineError::Invariant(what)
    })
}

/// Торговля окончена: решить, как разыгрывать банки.
pub fn begin_settlement(table: &mut Table, now: TimestampMs) -> SettlementStart {
    if table.turn.is_some() {
        table.set_turn(None, now);
    }

    if table.in_hand_count() < 2 {
        table.phase = HandPhase::RunningOut;
        return SettlementStart::FoldOut;
    }

    if table.primary_board().len() < 5 {
        table.deciding_run_it_twice = true;
        table.phase = HandPhase::DecidingRunItTwice;
        return SettlementStart::RunItTwiceWindow;
    }

    table.phase = HandPhase::RunningOut;
    SettlementStart::Showdown
}

/// Голос игрока за run-it-twice. Учитывается только пока открыто окно.
pub fn vote_run_it_twice(table: &mut Table, player_id: PlayerId) -> Result<(), EngineError> {
    let seat = table
        .seat_of(player_id)
        .ok_or(EngineError::PlayerNotAtTable(player_id))?;
    if !table.deciding_run_it_twice {
        return Err(EngineError::NoActiveHand);
    }
    let player = table
        .seat_mut(seat)
        .ok_or(EngineError::PlayerNotAtTable(player_id))?;
    if !player.in_hand {
        return Err(EngineError::NotInHand(player_id));
    }
    player.agree_to_run_it_twice = true;
    Ok(())
}

/// Закрыть окно голосования. Если согласились все оставшиеся в раздаче (и их хотя бы двое),
/// борд клонируется во второй, независимый.
pub fn resolve_run_it_twice(table: &mut Table, history: &mut HandHistory) -> bool {
    table.deciding_run_it_twice = false;
    table.phase = HandPhase::RunningOut;

    let in_hand: Vec<bool> = table
        .players()
        .filter(|(_, p)| p.in_hand)
        .map(|(_, p)| p.agree_to_run_it_twice)
        .collect();
    let everyone_agrees = in_hand.len() >= 2 && in_hand.iter().all(|&agreed| agreed);

    if everyone_agrees && table.community_boards.len() == 1 {
        let board = table.primary_board().to_vec();
        table.community_boards.push(board);
        history.push(HandEventKind::RunningItTwice);
        info!(table_id = table.id, hand_no = table.hand_no, "running it twice");
        return true;
    }
    false
}

/// Открыть следующую карту на каждом борде. `Ok(false)` – борд уже полный.
pub fn deal_runout_card(table: &mut Table, history: &mut HandHistory) -> Result<bool, EngineError> {
    if table.primary_board().len() >= 5 {
        return Ok(false);
    }
    deal_board_card(table, history)?;
    Ok(true)
}

/// Уборка после розыгрыша банков.
///
/// Игроки без фишек убираются со стола (в леджере – `dipped`). Если ACTIVE игроков
/// меньше двух, стол останавливается. Возвращает id вылетевших.
pub fn finish_hand(table: &mut Table, now: TimestampMs, history: &mut HandHistory) -> Vec<PlayerId> {
    let busted_seats: Vec<SeatIndex> = table
        .players()
        .filter(|(_, p)| p.stack < Chips(1))
        .map(|(s, _)| s)
        .collect();

    let mut busted = Vec::with_capacity(busted_seats.len());
    for seat in busted_seats {
        let Some(player) = table.remove_player(seat) else {
            continue;
        };
        if let Some(entry) = table.ledger.get_mut(&player.id) {
            entry.record_bust();
        }
        history.push(HandEventKind::PlayerBusted {
            player_id: player.id,
            name: player.display_name.clone(),
        });
        info!(table_id = table.id, player_id = player.id, seat, "player busted");
        busted.push(player.id);
    }

    if table.active_count() < 2 {
        table.active = false;
    }

    for (_, p) in table.players_mut() {
        p.bet = Chips::ZERO;
        p.all_in = false;
        p.in_hand = false;
    }

    table.pots.clear();
    table.deck.clear();
    if table.turn.is_some() {
        table.set_turn(None, now);
    }
    table.deciding_run_it_twice = false;
    table.current_bet = Chips::ZERO;
    table.big_blind_seat = None;
    table.phase = HandPhase::Settled;

    history.push(HandEventKind::HandFinished {
        hand_no: table.hand_no,
    });
    busted
}
