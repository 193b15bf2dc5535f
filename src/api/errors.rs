use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::TableId;
use crate::engine::{EngineError, ErrorClass};
use crate::infra::StoreError;

/// Ошибки внешнего API (то, что отдаём клиенту в ответ на команду).
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiError {
    /// Неправильные входные данные (например, битый JSON или конфиг стола).
    #[error("Некорректный запрос: {0}")]
    BadRequest(String),

    #[error("Стол {0} не найден")]
    TableNotFound(TableId),

    /// Чего-то нет: заявки, игрока за столом.
    #[error("Не найдено: {0}")]
    NotFound(String),

    /// Действие не разрешено в текущем состоянии. Состояние не изменилось.
    #[error("Недопустимое действие: {0}")]
    IllegalAction(String),

    /// Команда только для владельца стола.
    #[error("Команда доступна только владельцу стола")]
    Forbidden,

    /// Раздача прервана, стол остался в последнем сохранённом состоянии.
    #[error("Внутренняя ошибка: {0}")]
    Internal(String),

    /// Рантайм стола остановлен.
    #[error("Стол {0} недоступен")]
    Unavailable(TableId),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match (&err, err.class()) {
            (EngineError::TableNotFound(id), _) => ApiError::TableNotFound(*id),
            (EngineError::NotOwner, _) => ApiError::Forbidden,
            (_, ErrorClass::NotFound) => ApiError::NotFound(err.to_string()),
            (_, ErrorClass::IllegalAction) => ApiError::IllegalAction(err.to_string()),
            (_, ErrorClass::InvariantViolation) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ApiError::TableNotFound(id),
            StoreError::IngressNotFound(_) => ApiError::NotFound(err.to_string()),
            StoreError::Conflict { .. } => ApiError::Internal(err.to_string()),
        }
    }
}
