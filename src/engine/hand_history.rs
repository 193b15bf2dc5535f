use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::{PlayerId, SeatIndex};

/// Тип события в раздаче.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HandEventKind {
    /// Новая раздача началась: кнопка и блайнды.
    HandStarted {
        hand_no: u64,
        dealer: SeatIndex,
        small_blind: SeatIndex,
        big_blind: SeatIndex,
    },

    Checked {
        seat: SeatIndex,
        name: String,
    },

    Bet {
        seat: SeatIndex,
        name: String,
        amount: Chips,
    },

    /// Ставка всем стеком.
    Jammed {
        seat: SeatIndex,
        name: String,
        amount: Chips,
    },

    Called {
        seat: SeatIndex,
        name: String,
        amount: Chips,
    },

    CalledAllIn {
        seat: SeatIndex,
        name: String,
    },

    Folded {
        seat: SeatIndex,
        name: String,
    },

    /// На борд `board` открыты карты.
    BoardDealt {
        board: usize,
        cards: Vec<Card>,
    },

    /// Все согласились – доклад на два борда.
    RunningItTwice,

    /// Выплата из банка. `chopped` – банк поделен между несколькими победителями.
    PotAwarded {
        seat: SeatIndex,
        player_id: PlayerId,
        name: String,
        amount: Chips,
        chopped: bool,
    },

    /// Игрок вылетел и убран со стола.
    PlayerBusted {
        player_id: PlayerId,
        name: String,
    },

    HandFinished {
        hand_no: u64,
    },
}

impl HandEventKind {
    /// Серверная строка чата для события. None – событие в чат не пишется.
    pub fn chat_line(&self) -> Option<String> {
        use HandEventKind::*;
        let line = match self {
            Checked { name, .. } => format!("{name} checked"),
            Bet { name, amount, .. } => format!("{name} bet {amount}"),
            Jammed { name, amount, .. } => format!("{name} jammed for {amount}"),
            Called { name, amount, .. } => format!("{name} called for {amount}"),
            CalledAllIn { name, .. } => format!("{name} called all in"),
            Folded { name, .. } => format!("{name} folded"),
            RunningItTwice => "Running it twice".to_string(),
            PotAwarded {
                name,
                amount,
                chopped: false,
                ..
            } => format!("{name} won a pot for {amount}"),
            PotAwarded {
                name,
                amount,
                chopped: true,
                ..
            } => format!("{name} chopped a pot for {amount}"),
            PlayerBusted { name, .. } => format!("{name} busted"),
            HandStarted { .. } | BoardDealt { .. } | HandFinished { .. } => return None,
        };
        Some(line)
    }
}

/// Событие в раздаче с порядковым номером.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandEvent {
    pub index: u32,
    pub kind: HandEventKind,
}

/// События одного шага обработки (одной команды или таймера).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandHistory {
    pub events: Vec<HandEvent>,
}

impl HandHistory {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, kind: HandEventKind) {
        let idx = self.events.len() as u32;
        self.events.push(HandEvent { index: idx, kind });
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Строки для серверного чата, в порядке событий.
    pub fn chat_lines(&self) -> Vec<String> {
        self.events.iter().filter_map(|e| e.kind.chat_line()).collect()
    }
}
