//! Инфраструктурный слой вокруг движка:
//! - генерация ID;
//! - RNG-реализации для движка;
//! - хранилище столов (контракт + in-memory);
//! - транспорт (контракт + тестовый и broadcast паблишеры);
//! - логирование.

pub mod ids;
pub mod persistence;
pub mod publisher;
pub mod rng;
pub mod telemetry;

pub use ids::*;
pub use persistence::*;
pub use publisher::*;
pub use rng::*;
pub use telemetry::init_tracing;
