//! Учёт банков: основной банк и сайд-поты.
//!
//! Все ставки улицы складываются в последний банк. При закрытии улицы
//! `derive_side_pots` отрезает от него слои выше ставок "замороженных" игроков
//! (олл-ин или AWAY посреди раздачи), которые не могут выиграть то, что не уравняли.

use crate::domain::{Chips, Pot, SeatIndex, Table};

/// Добавить фишки в текущий (последний) банк.
pub fn add_to_current_pot(table: &mut Table, amount: Chips) {
    if amount.is_zero() {
        return;
    }
    match table.pots.last_mut() {
        Some(pot) => pot.size += amount,
        None => {
            let eligible = in_hand_seats(table);
            table.pots.push(Pot::new(amount, eligible));
        }
    }
}

/// Убрать место из всех банков (фолд).
pub fn remove_from_pots(table: &mut Table, seat: SeatIndex) {
    for pot in table.pots.iter_mut() {
        pot.players.retain(|&s| s != seat);
    }
}

/// Разрезать текущий банк по уровням ставок замороженных игроков.
///
/// Для каждого уровня L (по возрастанию) всё, что поставлено сверх L,
/// переезжает в новый банк, из которого исключены замороженные игроки со ставкой <= L.
/// N разных уровней дают до N+1 банков. Ставки игроков не меняются.
///
/// Если после этого в последнем банке остался замороженный игрок, открывается
/// пустой банк для следующих улиц – только для тех, кто ещё может ставить.
pub fn derive_side_pots(table: &mut Table) {
    let Some(current) = table.pots.last() else {
        return;
    };

    let mut levels: Vec<Chips> = current
        .players
        .iter()
        .filter_map(|&seat| table.seat(seat))
        .filter(|p| p.is_frozen())
        .map(|p| p.bet)
        .collect();
    levels.sort();
    levels.dedup();

    let bets: Vec<(SeatIndex, Chips, bool)> = table
        .players()
        .map(|(seat, p)| (seat, p.bet, p.is_frozen()))
        .collect();

    for level in levels {
        let moved: Chips = bets.iter().map(|(_, bet, _)| bet.saturating_sub(level)).sum();
        if moved.is_zero() {
            continue;
        }

        let Some(current) = table.pots.last_mut() else {
            return;
        };
        let moved = moved.min(current.size);
        current.size -= moved;

        let eligible: Vec<SeatIndex> = current
            .players
            .iter()
            .copied()
            .filter(|seat| {
                !bets
                    .iter()
                    .any(|(s, bet, frozen)| s == seat && *frozen && *bet <= level)
            })
            .collect();
        table.pots.push(Pot::new(moved, eligible));
    }

    let newest_has_frozen = table.pots.last().map_or(false, |pot| {
        pot.players
            .iter()
            .any(|&seat| table.seat(seat).map_or(false, |p| p.is_frozen()))
    });
    if newest_has_frozen {
        let live: Vec<SeatIndex> = table
            .players()
            .filter(|(_, p)| p.can_act())
            .map(|(seat, _)| seat)
            .collect();
        if !live.is_empty() {
            table.pots.push(Pot::new(Chips::ZERO, live));
        }
    }
}

/// Стартовые банки из анте.
///
/// Кто не смог внести анте целиком, претендует только на слой до своей суммы:
/// каждый короткий уровень отрезает банк, последний банк – для внёсших анте полностью.
/// Без коротких анте получается один банк на всех из `eligible`.
pub fn ante_pots(antes: &[(SeatIndex, Chips)], ante: Chips, eligible: &[SeatIndex]) -> Vec<Pot> {
    let mut levels: Vec<Chips> = antes
        .iter()
        .map(|&(_, paid)| paid)
        .filter(|&paid| paid < ante)
        .collect();
    levels.push(ante);
    levels.sort();
    levels.dedup();

    let mut pots = Vec::with_capacity(levels.len());
    let mut floor = Chips::ZERO;
    for level in levels {
        let size: Chips = antes
            .iter()
            .map(|&(_, paid)| paid.min(level).saturating_sub(floor))
            .sum();
        let players: Vec<SeatIndex> = eligible
            .iter()
            .copied()
            .filter(|seat| {
                antes
                    .iter()
                    .find(|(s, _)| s == seat)
                    .map_or(true, |&(_, paid)| paid >= level)
            })
            .collect();
        if !size.is_zero() {
            pots.push(Pot::new(size, players));
        }
        floor = level;
    }

    if pots.is_empty() {
        pots.push(Pot::new(Chips::ZERO, eligible.to_vec()));
    }
    pots
}

fn in_hand_seats(table: &Table) -> Vec<SeatIndex> {
    table
        .players()
        .filter(|(_, p)| p.in_hand)
        .map(|(seat, _)| seat)
        .collect()
}
