use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;

/// Запись леджера бай-инов. Никогда не удаляется (аудит сессии).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerEntry {
    pub display_name: String,
    /// Суммарный бай-ин за сессию.
    pub buy_in: Chips,
    /// Игрок сейчас не за столом (ушёл или вылетел).
    pub dipped: bool,
    /// Сколько фишек игрок унёс со стола при уходах.
    pub dipped_with_stack: Chips,
}

impl LedgerEntry {
    pub fn record_buy_in(&mut self, display_name: &str, amount: Chips) {
        self.display_name = display_name.to_string();
        self.buy_in += amount;
        self.dipped = false;
    }

    pub fn record_leave(&mut self, stack: Chips) {
        self.dipped = true;
        self.dipped_with_stack += stack;
    }

    pub fn record_bust(&mut self) {
        self.dipped = true;
    }

    /// Результат сессии: унёс минус занёс (если игрок ещё сидит, его стек не учитывается).
    pub fn net(&self) -> i128 {
        self.dipped_with_stack.0 as i128 - self.buy_in.0 as i128
    }
}
