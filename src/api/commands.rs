use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::table::{SeatCount, TableConfig};
use crate::domain::{IngressRequestId, PlayerId, SeatIndex};

/// Команда к столу. Личность отправителя (`actor`) приходит отдельно:
/// авторизация вне крейта.
///
/// JSON: `{"type": "BET", "amount": 200}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    Check,
    Bet {
        amount: Chips,
    },
    Call,
    Fold,
    /// Сесть за стол. Владелец садится сразу, остальные создают заявку.
    Sit {
        seat: SeatIndex,
        display_name: String,
        amount: Chips,
    },
    /// Только владелец.
    Approve {
        player_id: PlayerId,
        seat: SeatIndex,
        stack: Chips,
        ingress_request_id: IngressRequestId,
    },
    /// Только владелец.
    Deny {
        ingress_request_id: IngressRequestId,
    },
    /// Только владелец.
    Start,
    /// Только владелец.
    Pause,
    Leave,
    Show,
    Unshow,
    RunItTwice,
    Away,
    Back,
    SendChat {
        message: String,
    },
    /// Только владелец, между раздачами.
    SetConfig {
        small_blind: Chips,
        big_blind: Chips,
        ante: Chips,
    },
    /// Докупка фишек. Принимается, но пока ничего не делает.
    Rebuy {
        amount: Chips,
    },
}

impl Command {
    /// Команды, доступные только владельцу стола.
    pub fn owner_only(&self) -> bool {
        matches!(
            self,
            Command::Approve { .. }
                | Command::Deny { .. }
                | Command::Start
                | Command::Pause
                | Command::SetConfig { .. }
        )
    }

    /// Короткое имя для логов.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Check => "CHECK",
            Command::Bet { .. } => "BET",
            Command::Call => "CALL",
            Command::Fold => "FOLD",
            Command::Sit { .. } => "SIT",
            Command::Approve { .. } => "APPROVE",
            Command::Deny { .. } => "DENY",
            Command::Start => "START",
            Command::Pause => "PAUSE",
            Command::Leave => "LEAVE",
            Command::Show => "SHOW",
            Command::Unshow => "UNSHOW",
            Command::RunItTwice => "RUN_IT_TWICE",
            Command::Away => "AWAY",
            Command::Back => "BACK",
            Command::SendChat { .. } => "SEND_CHAT",
            Command::SetConfig { .. } => "SET_CONFIG",
            Command::Rebuy { .. } => "REBUY",
        }
    }
}

/// Создание стола.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTableCommand {
    pub name: String,
    /// 6 или 9.
    pub max_seats: u8,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Chips,
}

impl CreateTableCommand {
    /// Проверить и собрать конфиг стола.
    pub fn to_config(&self) -> Result<TableConfig, String> {
        let max_seats = SeatCount::try_from(self.max_seats)?;
        let config = TableConfig::new(max_seats, self.small_blind, self.big_blind, self.ante);
        config.validate()?;
        Ok(config)
    }
}
