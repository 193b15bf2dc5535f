//! Решения watchdog: предупредить, сходить за игрока или ничего не делать.

use serde::{Deserialize, Serialize};

use crate::domain::{Chips, Player};
use crate::engine::PlayerActionKind;

use super::TimeRules;

/// Что делать проверке watchdog при данном времени хода.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TurnVerdict {
    /// Время ещё есть.
    Idle,
    /// Время на исходе – отправить предупреждение.
    Warn,
    /// Часы хода истекли – ходить за игрока.
    AutoAct,
}

/// Решение по прошедшему с начала хода времени.
pub fn inspect(rules: &TimeRules, elapsed_ms: u64) -> TurnVerdict {
    if elapsed_ms > rules.action_clock_ms {
        TurnVerdict::AutoAct
    } else if elapsed_ms > rules.warn_after_ms {
        TurnVerdict::Warn
    } else {
        TurnVerdict::Idle
    }
}

/// Авто-ход за игрока.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AutoActionDecision {
    /// Fold, если игрок должен доставить, иначе check.
    pub action: PlayerActionKind,
    /// Игрок после этого хода уходит в AWAY.
    pub goes_away: bool,
}

/// Засчитать авто-ход: счётчик растёт, на пороге игрок уходит в AWAY.
pub fn register_auto_action(rules: &TimeRules, player: &mut Player, current_bet: Chips) -> AutoActionDecision {
    player.auto_action_count += 1;
    let goes_away = player.auto_action_count >= rules.away_after_auto_actions;
    AutoActionDecision {
        action: check_or_fold(player, current_bet),
        goes_away,
    }
}

pub fn check_or_fold(player: &Player, current_bet: Chips) -> PlayerActionKind {
    if current_bet > player.bet {
        PlayerActionKind::Fold
    } else {
        PlayerActionKind::Check
    }
}
