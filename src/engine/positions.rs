//! Ротация мест: кто ходит следующим, где блайнды, кто "эффективная кнопка".

use crate::domain::{SeatIndex, Table};

/// Может ли игрок на этом месте получить ход.
fn is_eligible(table: &Table, seat: SeatIndex) -> bool {
    table.seat(seat).map(|p| p.can_act()).unwrap_or(false)
}

fn step(table: &Table, seat: SeatIndex) -> SeatIndex {
    (seat + 1) % table.max_seats()
}

/// Следующее место после `seat` (по кругу), где сидит игрок, который может ходить.
///
/// Не больше `max_seats - 1` шагов: если круг вернулся к исходному месту – None.
/// Само исходное место никогда не возвращается.
pub fn next_seat_from(table: &Table, seat: SeatIndex) -> Option<SeatIndex> {
    let max = table.max_seats();
    if max == 0 {
        return None;
    }
    let origin = seat % max;
    let mut idx = step(table, origin);

    for _ in 1..max {
        if is_eligible(table, idx) {
            return Some(idx);
        }
        idx = step(table, idx);
    }

    None
}

/// `next_seat_from`, применённый n раз. Любой промежуточный None даёт None.
/// Нужен для поиска биг-блайнда: `nth_seat_from(table, 2, dealer)`.
pub fn nth_seat_from(table: &Table, n: usize, start: SeatIndex) -> Option<SeatIndex> {
    let mut seat = start;
    for _ in 0..n {
        seat = next_seat_from(table, seat)?;
    }
    Some(seat)
}

/// Ходит ли это место последним на улице.
///
/// Да, если это сама кнопка, либо если на местах после `seat` вплоть до кнопки
/// (включительно) нет никого, кто ещё может ходить: кнопка сфолдила, вылетела или в олл-ине.
pub fn is_effective_button(table: &Table, seat: SeatIndex) -> bool {
    if seat == table.dealer {
        return true;
    }

    let mut idx = seat;
    for _ in 0..table.max_seats() {
        idx = step(table, idx);
        if idx == seat {
            break;
        }
        if is_eligible(table, idx) {
            return false;
        }
        if idx == table.dealer {
            return true;
        }
    }

    true
}
