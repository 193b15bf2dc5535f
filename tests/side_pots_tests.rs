//! Сайд-поты: слои по ставкам замороженных игроков, фолды, свежий банк для живых.

mod common;

use common::table_with;
use poker_tables::domain::{Chips, PlayerStatus, Pot, SeatIndex, Table};
use poker_tables::engine::{add_to_current_pot, ante_pots, derive_side_pots, remove_from_pots};

/// Все игроки в раздаче, ставки `bets`, банк = сумма ставок.
fn street_with_bets(stacks: &[u64], bets: &[u64]) -> Table {
    let mut table = table_with(stacks);
    let seats: Vec<SeatIndex> = (0..bets.len() as SeatIndex).collect();
    for (seat, &bet) in bets.iter().enumerate() {
        let p = table.seat_mut(seat as SeatIndex).unwrap();
        p.in_hand = true;
        p.bet = Chips(bet);
        p.stack = Chips(p.stack.0 - bet);
        if p.stack.is_zero() {
            p.all_in = true;
        }
    }
    let total = bets.iter().sum();
    table.pots.push(Pot::new(Chips(total), seats));
    table
}

fn sizes(table: &Table) -> Vec<u64> {
    table.pots.iter().map(|p| p.size.0).collect()
}

#[test]
fn short_all_in_carves_main_pot() {
    // Ставки 100, 100, 50, 200; у третьего всего 50.
    let mut table = street_with_bets(&[500, 500, 50, 500], &[100, 100, 50, 200]);

    derive_side_pots(&mut table);

    assert_eq!(table.pots[0], Pot::new(Chips(200), vec![0, 1, 2, 3]));
    assert_eq!(table.pots[1], Pot::new(Chips(250), vec![0, 1, 3]));
    assert_eq!(table.pots.len(), 2);
}

#[test]
fn three_distinct_all_in_levels_make_three_layers() {
    let mut table = street_with_bets(&[100, 200, 300, 1000], &[100, 200, 300, 300]);

    derive_side_pots(&mut table);

    // Уровень 300 ничего не отрезает: сверху никто не ставил.
    // Третий в олл-ине, поэтому для следующих улиц открыт пустой банк только для живых.
    assert_eq!(sizes(&table), vec![400, 300, 200, 0]);
    assert_eq!(table.pots[0].players, vec![0, 1, 2, 3]);
    assert_eq!(table.pots[1].players, vec![1, 2, 3]);
    assert_eq!(table.pots[2].players, vec![2, 3]);
    assert_eq!(table.pots[3].players, vec![3]);
}

#[test]
fn equal_all_ins_collapse_into_one_level() {
    let mut table = street_with_bets(&[100, 100, 500], &[100, 100, 100]);

    derive_side_pots(&mut table);

    assert_eq!(table.pots[0], Pot::new(Chips(300), vec![0, 1, 2]));
    assert_eq!(table.pots[1], Pot::new(Chips::ZERO, vec![2]));
}

#[test]
fn folded_chips_stay_in_the_layers() {
    // Второй поставил 100 и сфолдил, первый в олл-ине на 40, третий поставил 100.
    let mut table = street_with_bets(&[40, 500, 500], &[40, 100, 100]);
    {
        let p = table.seat_mut(1).unwrap();
        p.in_hand = false;
        p.folded = true;
    }
    remove_from_pots(&mut table, 1);

    derive_side_pots(&mut table);

    assert_eq!(table.pots[0], Pot::new(Chips(120), vec![0, 2]));
    assert_eq!(table.pots[1], Pot::new(Chips(120), vec![2]));
    assert_eq!(table.total_pot(), Chips(240));
}

#[test]
fn away_player_is_frozen_like_all_in() {
    let mut table = street_with_bets(&[500, 500, 500], &[20, 60, 60]);
    table.seat_mut(0).unwrap().status = PlayerStatus::Away;

    derive_side_pots(&mut table);

    assert_eq!(table.pots[0], Pot::new(Chips(60), vec![0, 1, 2]));
    assert_eq!(table.pots[1], Pot::new(Chips(80), vec![1, 2]));
    assert_eq!(table.pots.len(), 2);
}

#[test]
fn no_frozen_players_means_single_pot() {
    let mut table = street_with_bets(&[500, 500, 500], &[60, 60, 60]);

    derive_side_pots(&mut table);

    assert_eq!(table.pots, vec![Pot::new(Chips(180), vec![0, 1, 2])]);
}

#[test]
fn add_to_current_pot_opens_pot_for_in_hand_seats() {
    let mut table = table_with(&[100, 100, 100]);
    table.seat_mut(0).unwrap().in_hand = true;
    table.seat_mut(2).unwrap().in_hand = true;

    add_to_current_pot(&mut table, Chips(30));
    add_to_current_pot(&mut table, Chips(20));
    add_to_current_pot(&mut table, Chips::ZERO);

    assert_eq!(table.pots, vec![Pot::new(Chips(50), vec![0, 2])]);
}

#[test]
fn remove_from_pots_touches_every_pot() {
    let mut table = table_with(&[100, 100, 100]);
    table.pots = vec![
        Pot::new(Chips(30), vec![0, 1, 2]),
        Pot::new(Chips(20), vec![1, 2]),
    ];

    remove_from_pots(&mut table, 1);

    assert_eq!(table.pots[0].players, vec![0, 2]);
    assert_eq!(table.pots[1].players, vec![2]);
}

#[test]
fn short_antes_cut_their_own_layers() {
    // Анте 5; второй внёс 2, четвёртый 4.
    let antes = [(0, Chips(5)), (1, Chips(2)), (2, Chips(5)), (3, Chips(4))];

    let pots = ante_pots(&antes, Chips(5), &[0, 1, 2, 3]);

    assert_eq!(
        pots,
        vec![
            Pot::new(Chips(8), vec![0, 1, 2, 3]),
            Pot::new(Chips(6), vec![0, 2, 3]),
            Pot::new(Chips(2), vec![0, 2]),
        ]
    );
}

#[test]
fn full_antes_make_one_pot() {
    let antes = [(0, Chips(3)), (1, Chips(3)), (2, Chips(3))];

    assert_eq!(
        ante_pots(&antes, Chips(3), &[0, 1, 2]),
        vec![Pot::new(Chips(9), vec![0, 1, 2])]
    );
    assert_eq!(
        ante_pots(&[], Chips::ZERO, &[0, 2]),
        vec![Pot::new(Chips::ZERO, vec![0, 2])]
    );
}
