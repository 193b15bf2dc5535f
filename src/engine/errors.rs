use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{IngressRequestId, PlayerId, SeatIndex, TableId};

/// Класс ошибки: как на неё реагирует рантайм стола.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorClass {
    /// Чего-то нет – отказ, состояние не меняется.
    NotFound,
    /// Недопустимое действие – игнорируется с записью в лог, без рассылки.
    IllegalAction,
    /// Нарушен инвариант – операция прерывается, стол остаётся в последнем сохранённом виде.
    InvariantViolation,
}

/// Ошибки движка стола.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Стол {0} не найден")]
    TableNotFound(TableId),

    #[error("Заявка {0} не найдена")]
    IngressRequestNotFound(IngressRequestId),

    #[error("Игрок {0} не сидит за столом")]
    PlayerNotAtTable(PlayerId),

    #[error("Место {0} не существует за столом")]
    InvalidSeat(SeatIndex),

    #[error("Место {0} уже занято")]
    SeatOccupied(SeatIndex),

    #[error("Свободных мест нет")]
    TableFull,

    #[error("Игрок {0} уже сидит за столом")]
    AlreadySeated(PlayerId),

    #[error("У игрока {0} уже есть заявка на место")]
    IngressAlreadyPending(PlayerId),

    #[error("Сейчас не ход игрока с id={0}")]
    NotPlayersTurn(PlayerId),

    #[error("Игрок {0} не участвует в раздаче")]
    NotInHand(PlayerId),

    #[error("Раздача не идёт")]
    NoActiveHand,

    #[error("Раздача уже идёт")]
    HandInProgress,

    #[error("Нельзя уйти со стола посреди раздачи")]
    LeaveWhileInHand,

    #[error("Недостаточно активных игроков для раздачи")]
    NotEnoughPlayers,

    #[error("Стол не запущен")]
    TableInactive,

    #[error("Стол уже запущен")]
    TableAlreadyActive,

    #[error("Команда доступна только владельцу стола")]
    NotOwner,

    #[error("Невозможно выполнить check – нужно хотя бы уравнять ставку")]
    CannotCheck,

    #[error("Невозможно выполнить call – нет ставки для уравнивания")]
    CannotCall,

    #[error("Все соперники уже в олл-ине, ставить некуда")]
    EveryoneAllIn,

    #[error("Ставка {amount} больше, чем есть у игрока ({available})")]
    NotEnoughChips { amount: u64, available: u64 },

    #[error("Ставка {amount} меньше минимальной ({min_raise_to})")]
    RaiseTooSmall { amount: u64, min_raise_to: u64 },

    #[error("Некорректная сумма: {0}")]
    InvalidAmount(u64),

    #[error("Некорректное имя игрока: {0:?}")]
    InvalidDisplayName(String),

    #[error("Некорректное сообщение чата")]
    InvalidChatMessage,

    #[error("Некорректный конфиг стола: {0}")]
    InvalidConfig(String),

    #[error("Нарушение инварианта: {0}")]
    Invariant(&'static str),
}

impl EngineError {
    pub fn class(&self) -> ErrorClass {
        use EngineError::*;
        match self {
            TableNotFound(_) | IngressRequestNotFound(_) | PlayerNotAtTable(_) => {
                ErrorClass::NotFound
            }
            Invariant(_) => ErrorClass::InvariantViolation,
            _ => ErrorClass::IllegalAction,
        }
    }
}
