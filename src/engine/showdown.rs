//! Розыгрыш банков: по каждому банку, по каждому борду.

use tracing::debug;

use crate::domain::chips::Chips;
use crate::domain::{Card, Pot, SeatIndex, Table};
use crate::engine::errors::EngineError;
use crate::engine::hand_history::{HandEventKind, HandHistory};
use crate::eval::HandRankOracle;

/// Разыграть все банки и зачислить выигрыши.
///
/// Правило остатков: банк делится на борды как `floor(size / boards)`, остаток идёт
/// первому борду; доля борда делится между равными победителями как `floor(share / k)`,
/// лишние фишки по одной получают победители по порядку мест слева от кнопки.
/// Сумма выплат всегда равна банку.
///
/// Банк с одним претендентом отдаётся без сравнения рук. Банк без претендентов
/// присоединяется к предыдущему.
pub fn settle_pots<O: HandRankOracle + ?Sized>(
    table: &mut Table,
    oracle: &O,
    history: &mut HandHistory,
) -> Result<(), EngineError> {
    let pots = merge_orphan_pots(std::mem::take(&mut table.pots));

    for pot in pots {
        if pot.size.is_zero() {
            continue;
        }

        let mut contenders: Vec<SeatIndex> = pot
            .players
            .iter()
            .copied()
            .filter(|&s| table.seat(s).map_or(false, |p| p.in_hand))
            .collect();
        order_from_dealer(table, &mut contenders);

        match contenders.as_slice() {
            [] => continue,
            [only] => credit(table, *only, pot.size, false, history),
            _ => split_between_boards(table, oracle, &pot, &contenders, history)?,
        }
    }

    Ok(())
}

fn split_between_boards<O: HandRankOracle + ?Sized>(
    table: &mut Table,
    oracle: &O,
    pot: &Pot,
    contenders: &[SeatIndex],
    history: &mut HandHistory,
) -> Result<(), EngineError> {
    if table.community_boards.is_empty()
        || table.community_boards.iter().any(|b| b.len() != 5)
    {
        return Err(EngineError::Invariant("борд не доложен до шоудауна"));
    }

    for &seat in contenders {
        if let Some(p) = table.seat_mut(seat) {
            p.is_showing = true;
        }
    }

    let boards = table.community_boards.clone();
    let (per_board, remainder) = pot.size.split(boards.len() as u64);

    for (idx, board) in boards.iter().enumerate() {
        let share = if idx == 0 { per_board + remainder } else { per_board };

        let ranked: Vec<(SeatIndex, _)> = contenders
            .iter()
            .filter_map(|&seat| {
                let player = table.seat(seat)?;
                let mut cards: Vec<Card> = player.hole_cards.clone();
                cards.extend_from_slice(board);
                Some((seat, oracle.rank(&cards)))
            })
            .collect();

        let Some(best) = ranked.iter().map(|(_, r)| *r).max() else {
            continue;
        };
        let winners: Vec<SeatIndex> = ranked
            .iter()
            .filter(|(_, r)| *r == best)
            .map(|(s, _)| *s)
            .collect();

        debug!(table_id = table.id, board = idx, ?winners, share = share.0, "board settled");

        let (each, odd) = share.split(winners.len() as u64);
        let chopped = winners.len() > 1;
        for (i, &seat) in winners.iter().enumerate() {
            let extra = if (i as u64) < odd.0 { Chips(1) } else { Chips::ZERO };
            credit(table, seat, each + extra, chopped, history);
        }
    }

    Ok(())
}

fn credit(table: &mut Table, seat: SeatIndex, amount: Chips, chopped: bool, history: &mut HandHistory) {
    let Some(player) = table.seat_mut(seat) else {
        return;
    };
    player.stack += amount;
    player.winner = true;
    history.push(HandEventKind::PotAwarded {
        seat,
        player_id: player.id,
        name: player.display_name.clone(),
        amount,
        chopped,
    });
}

/// Места по порядку, начиная слева от кнопки.
fn order_from_dealer(table: &Table, seats: &mut [SeatIndex]) {
    let max = table.max_seats() as u16;
    let dealer = table.dealer as u16;
    seats.sort_by_key(|&s| (s as u16 + max - dealer - 1) % max);
}

/// Банк без претендентов сливается с предыдущим (или со следующим, если он первый).
fn merge_orphan_pots(pots: Vec<Pot>) -> Vec<Pot> {
    let mut merged: Vec<Pot> = Vec::with_capacity(pots.len());
    let mut carry = Chips::ZERO;

    for mut pot in pots {
        if pot.players.is_empty() {
            match merged.last_mut() {
                Some(prev) => prev.size += pot.size,
                None => carry += pot.size,
            }
            continue;
        }
        pot.size += carry;
        carry = Chips::ZERO;
        merged.push(pot);
    }

    merged
}
