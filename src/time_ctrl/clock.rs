// src/time_ctrl/clock.rs
//! Источник времени для отметок `turn_started_at`.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::TimestampMs;

/// Текущее время в миллисекундах.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> TimestampMs;
}

/// Wall-clock системы.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> TimestampMs {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as TimestampMs)
            .unwrap_or(0)
    }
}

/// Часы на `tokio::time::Instant`, привязанные к wall-clock в момент создания.
///
/// В тестах с `start_paused = true` идут вместе с виртуальным временем tokio,
/// поэтому таймеры watchdog и отметки хода согласованы.
#[derive(Clone, Copy, Debug)]
pub struct TokioClock {
    origin: tokio::time::Instant,
    origin_ms: TimestampMs,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
            origin_ms: SystemClock.now_ms(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> TimestampMs {
        self.origin_ms + self.origin.elapsed().as_millis() as TimestampMs
    }
}
