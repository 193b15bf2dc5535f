use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::PlayerId;

/// Статус игрока за столом (не путать с участием в раздаче).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerStatus {
    /// Получает карты в новой раздаче и может ходить.
    Active,
    /// Отошёл: пропускается ротацией, карт в новой раздаче не получает.
    Away,
}

/// Игрок на конкретном месте.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    pub stack: Chips,
    /// Ставка на текущей улице. Эти фишки уже лежат в банке.
    pub bet: Chips,
    pub status: PlayerStatus,
    pub in_hand: bool,
    pub all_in: bool,
    pub folded: bool,
    pub winner: bool,
    pub is_showing: bool,
    pub agree_to_run_it_twice: bool,
    /// 0 или 2 карты.
    pub hole_cards: Vec<Card>,
    /// Сколько раз подряд за игрока сходил watchdog.
    pub auto_action_count: u32,
}

impl Player {
    pub fn new(id: PlayerId, display_name: impl Into<String>, stack: Chips) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            stack,
            bet: Chips::ZERO,
            status: PlayerStatus::Active,
            in_hand: false,
            all_in: false,
            folded: false,
            winner: false,
            is_showing: false,
            agree_to_run_it_twice: false,
            hole_cards: Vec::new(),
            auto_action_count: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    /// Может ли игрок ещё делать ходы на этой улице (критерий ротации мест).
    pub fn can_act(&self) -> bool {
        self.is_active() && self.in_hand && !self.all_in
    }

    /// "Замороженный" участник: в раздаче, но больше не ходит
    /// (олл-ин или ушёл в AWAY посреди раздачи). Претендует только на то, что уравнял.
    pub fn is_frozen(&self) -> bool {
        self.in_hand && (self.all_in || !self.is_active())
    }

    /// Всё, что игрок может поставить на этой улице (стек + уже поставленное).
    pub fn total_available(&self) -> Chips {
        self.stack + self.bet
    }

    /// Перенести фишки из стека в ставку. Возвращает реально списанную сумму.
    pub fn commit(&mut self, amount: Chips) -> Chips {
        let paid = amount.min(self.stack);
        self.stack -= paid;
        self.bet += paid;
        if self.stack.is_zero() && self.in_hand {
            self.all_in = true;
        }
        paid
    }

    /// Сбросить всё, что относится к прошлой раздаче.
    pub fn reset_for_new_hand(&mut self) {
        self.bet = Chips::ZERO;
        self.in_hand = false;
        self.all_in = false;
        self.folded = false;
        self.winner = false;
        self.is_showing = false;
        self.agree_to_run_it_twice = false;
        self.hole_cards.clear();
    }
}
