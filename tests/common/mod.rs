//! Общие утилиты интеграционных тестов движка.

#![allow(dead_code)]

use poker_tables::domain::{parse_cards, Card, Chips, Player, PlayerId, SeatCount, SeatIndex, Table, TableConfig};
use poker_tables::engine::{self, ActionOutcome, EngineError, HandHistory, PlayerAction, PlayerActionKind, RandomSource};

pub const OWNER: PlayerId = 1;

/// shuffle ничего не делает: колода остаётся в стандартном порядке.
#[derive(Default)]
pub struct NoShuffle;

impl RandomSource for NoShuffle {
    fn shuffle<T>(&mut self, _slice: &mut [T]) {}
}

/// Игрок на месте `seat` получает id `seat + 1` и имя `p{seat}`.
pub fn pid(seat: SeatIndex) -> PlayerId {
    seat as PlayerId + 1
}

/// 6-max стол, блайнды 1/2, игроки со стеками `stacks` на местах 0..n. Стол запущен.
pub fn table_with(stacks: &[u64]) -> Table {
    table_with_blinds(stacks, 1, 2, 0)
}

pub fn table_with_blinds(stacks: &[u64], sb: u64, bb: u64, ante: u64) -> Table {
    let config = TableConfig::new(SeatCount::Six, Chips(sb), Chips(bb), Chips(ante));
    let mut table = Table::new(1, "test", OWNER, config);
    for (seat, &stack) in stacks.iter().enumerate() {
        let seat = seat as SeatIndex;
        table.seat_player(seat, Player::new(pid(seat), format!("p{seat}"), Chips(stack)));
    }
    table.active = true;
    table
}

pub fn start(table: &mut Table, history: &mut HandHistory) -> ActionOutcome {
    engine::new_hand(table, &mut NoShuffle, 0, history).expect("hand should start")
}

pub fn act(
    table: &mut Table,
    history: &mut HandHistory,
    seat: SeatIndex,
    kind: PlayerActionKind,
) -> Result<ActionOutcome, EngineError> {
    engine::apply_action(table, &PlayerAction::manual(pid(seat), kind), 0, history)
}

pub fn cards(s: &str) -> Vec<Card> {
    parse_cards(s).expect("valid cards")
}

/// Положить в колоду карты так, чтобы они выходили в порядке строки.
pub fn stack_deck(table: &mut Table, s: &str) {
    let mut order = cards(s);
    order.reverse();
    table.deck.cards = order;
}

pub fn stack_of(table: &Table, seat: SeatIndex) -> u64 {
    table.seat(seat).map(|p| p.stack.0).unwrap_or(0)
}

/// Стеки + банки должны совпадать с леджером.
pub fn assert_conserved(table: &Table) {
    assert_eq!(
        table.chips_in_play(),
        table.ledger_balance(),
        "фишки не сходятся с леджером"
    );
}
