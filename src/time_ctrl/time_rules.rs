// src/time_ctrl/time_rules.rs
//! Конфигурация тайминга стола: часы хода, watchdog, паузы доклада борда.
//!
//! Только "правила", без состояния и без привязки к конкретному столу.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Правила тайминга для стола. Все значения в миллисекундах.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimeRules {
    /// Сколько даётся на ход. Дольше – watchdog ходит за игрока.
    pub action_clock_ms: u64,
    /// После этого порога watchdog только предупреждает.
    pub warn_after_ms: u64,
    /// Когда после начала хода срабатывают проверки watchdog.
    pub first_check_ms: u64,
    pub second_check_ms: u64,
    /// После стольких авто-ходов подряд игрок уходит в AWAY.
    pub away_after_auto_actions: u32,
    /// Окно голосования за run-it-twice.
    pub run_it_twice_grace_ms: u64,
    /// Пауза после каждой открытой карты доклада (когда на борде уже 3+ карты).
    pub reveal_pause_ms: u64,
    /// Пауза между раздачами.
    pub next_hand_delay_ms: u64,
}

impl TimeRules {
    /// 15 сек на ход, предупреждение после 10, проверки на 11 и 16 сек.
    pub const fn standard() -> Self {
        Self {
            action_clock_ms: 15_000,
            warn_after_ms: 10_000,
            first_check_ms: 11_000,
            second_check_ms: 16_000,
            away_after_auto_actions: 2,
            run_it_twice_grace_ms: 5_000,
            reveal_pause_ms: 1_000,
            next_hand_delay_ms: 10_000,
        }
    }

    /// Разобрать правила из JSON. Отсутствующие поля берутся из `standard()`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Смещения проверок watchdog от начала хода.
    pub fn watchdog_checks(&self) -> [Duration; 2] {
        [
            Duration::from_millis(self.first_check_ms),
            Duration::from_millis(self.second_check_ms),
        ]
    }

    pub fn run_it_twice_grace(&self) -> Duration {
        Duration::from_millis(self.run_it_twice_grace_ms)
    }

    pub fn reveal_pause(&self) -> Duration {
        Duration::from_millis(self.reveal_pause_ms)
    }

    pub fn next_hand_delay(&self) -> Duration {
        Duration::from_millis(self.next_hand_delay_ms)
    }
}

impl Default for TimeRules {
    fn default() -> Self {
        Self::standard()
    }
}
