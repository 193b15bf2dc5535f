//! Внешний API столов.
//!
//! Здесь описываются:
//! - команды (commands.rs) – всё, что меняет состояние стола;
//! - запросы (queries.rs) – сборка видов стола с сокрытием чужих карт;
//! - DTO (dto.rs) – то, что уходит клиентам;
//! - ошибки (errors.rs) – то, что видит клиент.

pub mod commands;
pub mod dto;
pub mod errors;
pub mod queries;

pub use commands::*;
pub use dto::*;
pub use errors::*;
pub use queries::*;
