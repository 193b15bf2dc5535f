//! Транспорт: `publish(channel, message)`. Сам pub/sub вне крейта.

use std::sync::{Mutex, MutexGuard};

use tokio::sync::broadcast;
use tracing::trace;

use crate::api::dto::OutboundMessage;
use crate::domain::{PlayerId, TableId};

/// Канал с видом стола для гостей и лобби.
pub fn table_channel(table_id: TableId) -> String {
    format!("table/{table_id}")
}

/// Личный канал игрока: вид стола с его картами.
pub fn player_channel(table_id: TableId, player_id: PlayerId) -> String {
    format!("table/{table_id}/{player_id}")
}

pub fn chat_channel(table_id: TableId) -> String {
    format!("table/{table_id}/chat")
}

pub trait Publisher: Send + Sync {
    fn publish(&self, channel: &str, message: OutboundMessage);
}

/// Сообщение, ушедшее в канал.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Published {
    pub channel: String,
    pub message: OutboundMessage,
}

/// Запоминает всё опубликованное. Для тестов и CLI.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    sent: Mutex<Vec<Published>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Published>> {
        self.sent.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn messages(&self) -> Vec<Published> {
        self.lock().clone()
    }

    /// Сообщения одного канала, по порядку.
    pub fn on_channel(&self, channel: &str) -> Vec<OutboundMessage> {
        self.lock()
            .iter()
            .filter(|p| p.channel == channel)
            .map(|p| p.message.clone())
            .collect()
    }

    /// Тексты сообщений чата на канале `table/{id}/chat`.
    pub fn chat_lines(&self, table_id: TableId) -> Vec<String> {
        self.on_channel(&chat_channel(table_id))
            .into_iter()
            .filter_map(|m| match m {
                OutboundMessage::Chat(chat) => Some(chat.message),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Publisher for RecordingPublisher {
    fn publish(&self, channel: &str, message: OutboundMessage) {
        self.lock().push(Published {
            channel: channel.to_string(),
            message,
        });
    }
}

/// Кадр для внешнего транспорта: канал и JSON.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub channel: String,
    pub payload: String,
}

/// Паблишер поверх `tokio::sync::broadcast`: сериализует сообщения в JSON,
/// а веб-сокетный слой раздаёт кадры подписчикам по каналам.
#[derive(Debug, Clone)]
pub struct BroadcastPublisher {
    sender: broadcast::Sender<Frame>,
}

impl BroadcastPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Frame> {
        self.sender.subscribe()
    }
}

impl Publisher for BroadcastPublisher {
    fn publish(&self, channel: &str, message: OutboundMessage) {
        let payload = match serde_json::to_string(&message) {
            Ok(json) => json,
            Err(err) => {
                tracing::error!(channel, %err, "failed to serialize outbound message");
                return;
            }
        };
        // Нет подписчиков – кадр просто теряется.
        let receivers = self
            .sender
            .send(Frame {
                channel: channel.to_string(),
                payload,
            })
            .unwrap_or(0);
        trace!(channel, receivers, "frame published");
    }
}
