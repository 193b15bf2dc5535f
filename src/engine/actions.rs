use serde::{Deserialize, Serialize};

use crate::domain::{Chips, PlayerId};

/// Тип действия игрока в раунде ставок.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerActionKind {
    Fold,
    Check,
    Call,
    /// Bet или raise до итоговой суммы `amount` на этой улице.
    Bet(Chips),
}

/// Кто инициировал действие.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActionSource {
    /// Игрок сам нажал кнопку – счётчик авто-ходов сбрасывается.
    Manual,
    /// Ход сделал watchdog за неактивного игрока.
    Watchdog,
}

/// Конкретное действие игрока.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAction {
    pub player_id: PlayerId,
    pub kind: PlayerActionKind,
    pub source: ActionSource,
}

impl PlayerAction {
    pub fn manual(player_id: PlayerId, kind: PlayerActionKind) -> Self {
        Self {
            player_id,
            kind,
            source: ActionSource::Manual,
        }
    }

    pub fn auto(player_id: PlayerId, kind: PlayerActionKind) -> Self {
        Self {
            player_id,
            kind,
            source: ActionSource::Watchdog,
        }
    }
}
