//! Доменная модель стола: карты, фишки, игроки, банки, леджер бай-инов.

pub mod card;
pub mod chips;
pub mod deck;
pub mod hand;
pub mod ledger;
pub mod player;
pub mod table;

// Идентификаторы приходят снаружи (авторизация вне скоупа крейта).
pub type PlayerId = u64;
pub type TableId = u64;
pub type IngressRequestId = u64;

/// Метка времени в миллисекундах (wall-clock или виртуальное время тестов).
pub type TimestampMs = u64;

pub use card::*;
pub use chips::*;
pub use deck::*;
pub use hand::*;
pub use ledger::*;
pub use player::*;
pub use table::*;
