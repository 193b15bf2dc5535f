use serde::{Deserialize, Serialize};

/// Улица раздачи. Выводится из числа карт на основном борде.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    pub fn from_board_len(len: usize) -> Street {
        match len {
            0..=2 => Street::Preflop,
            3 => Street::Flop,
            4 => Street::Turn,
            _ => Street::River,
        }
    }

    /// Сколько карт открыть, когда закрывается раунд ставок на этой улице.
    pub fn cards_on_close(self) -> usize {
        match self {
            Street::Preflop => 3,
            Street::Flop | Street::Turn => 1,
            Street::River => 0,
        }
    }
}

/// Фаза стола с точки зрения жизненного цикла раздачи.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum HandPhase {
    /// Раздачи нет (меньше двух активных игроков или стол на паузе).
    #[default]
    Waiting,
    /// Идут раунды ставок.
    Betting,
    /// Окно голосования за run-it-twice.
    DecidingRunItTwice,
    /// Доклад борда без действий игроков.
    RunningOut,
    /// Банки разыграны, ждём следующую раздачу.
    Settled,
}

impl HandPhase {
    pub fn hand_in_progress(self) -> bool {
        matches!(
            self,
            HandPhase::Betting | HandPhase::DecidingRunItTwice | HandPhase::RunningOut
        )
    }
}

/// Сила руки от оракула. Больше = сильнее, равные значения = сплит.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandRank(pub u32);
