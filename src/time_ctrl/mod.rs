// src/time_ctrl/mod.rs
//! Контроль времени стола.
//!
//! Здесь собираем:
//! - правила (`TimeRules`);
//! - источник времени (`Clock`);
//! - решения watchdog (`inspect`, `register_auto_action`).
//!
//! Сами таймеры – отложенные сообщения в почтовый ящик стола (см. `service`).

pub mod clock;
pub mod time_rules;
pub mod watchdog;

pub use clock::{Clock, SystemClock, TokioClock};
pub use time_rules::TimeRules;
pub use watchdog::{check_or_fold, inspect, register_auto_action, AutoActionDecision, TurnVerdict};
