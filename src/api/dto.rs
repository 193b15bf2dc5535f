use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::HandPhase;
use crate::domain::player::PlayerStatus;
use crate::domain::{IngressRequestId, PlayerId, SeatIndex, TableId, TimestampMs};

/// Игрок за столом глазами конкретного зрителя.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerView {
    pub id: PlayerId,
    pub seat: SeatIndex,
    pub display_name: String,
    pub stack: Chips,
    pub bet: Chips,
    pub status: PlayerStatus,
    pub in_hand: bool,
    pub all_in: bool,
    pub folded: bool,
    pub winner: bool,
    pub is_showing: bool,
    pub agree_to_run_it_twice: bool,
    /// Пусто, если зрителю эти карты не положено видеть.
    pub hole_cards: Vec<Card>,
    /// Карты скрыты, но они есть (клиент рисует рубашки).
    pub has_cards: bool,
    pub is_you: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotView {
    pub size: Chips,
    pub players: Vec<SeatIndex>,
}

/// Стол глазами конкретного зрителя. Колода не попадает сюда никогда.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableView {
    pub id: TableId,
    pub name: String,
    pub owner: PlayerId,
    pub max_seats: u8,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Chips,
    pub active: bool,
    pub phase: HandPhase,
    pub hand_no: u64,
    pub turn: Option<SeatIndex>,
    pub turn_started_at: TimestampMs,
    pub dealer: SeatIndex,
    pub current_bet: Chips,
    pub min_raise_to: Chips,
    pub community_boards: Vec<Vec<Card>>,
    pub pots: Vec<PotView>,
    pub deciding_run_it_twice: bool,
    pub players: Vec<PlayerView>,
    pub ledger: Vec<LedgerView>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerView {
    pub player_id: PlayerId,
    pub display_name: String,
    pub buy_in: Chips,
    pub dipped: bool,
    pub dipped_with_stack: Chips,
}

/// Заявка на место, как её видит владелец.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngressRequestView {
    pub id: IngressRequestId,
    pub player_id: PlayerId,
    pub seat: SeatIndex,
    pub display_name: String,
    pub stack: Chips,
    pub created_at: TimestampMs,
}

/// Сообщение чата. `author` – имя игрока, "guest" или "server".
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub author: String,
    pub message: String,
    pub at: TimestampMs,
}

impl ChatMessage {
    pub const SERVER: &'static str = "server";
    pub const GUEST: &'static str = "guest";

    pub fn server(message: impl Into<String>, at: TimestampMs) -> Self {
        Self {
            author: Self::SERVER.to_string(),
            message: message.into(),
            at,
        }
    }
}

/// То, что уходит в транспорт.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboundMessage {
    State(Box<TableView>),
    Chat(ChatMessage),
    /// Клиент должен переподписаться (посадили, ушёл, вылетел).
    Boot,
}
