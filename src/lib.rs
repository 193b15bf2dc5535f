//! Движок живых покерных столов (NLHE, 6 или 9 мест).
//!
//! Слои:
//! - `domain` – данные стола: карты, фишки, игроки, банки, леджер;
//! - `engine` – правила раздачи поверх `&mut Table`, без I/O;
//! - `eval` – оценка рук;
//! - `time_ctrl` – правила времени и решения watchdog;
//! - `infra` – хранилище, рассылка, RNG, логирование;
//! - `api` – команды, виды стола, ошибки для клиента;
//! - `service` – актор на стол: команды и таймеры по очереди.

pub mod api;
pub mod domain;
pub mod engine;
pub mod eval;
pub mod infra;
pub mod service;
pub mod time_ctrl;

pub use service::{ServiceConfig, TableService};
