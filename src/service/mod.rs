//! Рантайм столов: по актору на стол.
//!
//! `TableService` – точка входа: создать стол, отправить команду, прочитать вид.
//! Все изменения конкретного стола идут через его почтовый ящик, поэтому
//! команды и таймеры одного стола никогда не пересекаются. Разные столы
//! работают параллельно.

pub mod actor;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::info;

use crate::api::{build_ingress_view, build_table_view, ApiError, Command, CreateTableCommand, IngressRequestView, TableView};
use crate::domain::{PlayerId, Table, TableId};
use crate::eval::HandRankOracle;
use crate::infra::{IdGenerator, Publisher, TableStore};
use crate::time_ctrl::{Clock, TimeRules};

pub use actor::{TableHandle, TableMsg, MAX_CHAT_LEN};

/// Настройки рантайма.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub rules: TimeRules,
    /// Размер почтового ящика одного стола.
    pub mailbox_capacity: usize,
    /// Фиксированный seed для колод (симуляции и тесты). `None` – системный RNG.
    pub rng_seed: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            rules: TimeRules::standard(),
            mailbox_capacity: 64,
            rng_seed: None,
        }
    }
}

pub(crate) struct Shared {
    pub(crate) store: Arc<dyn TableStore>,
    pub(crate) publisher: Arc<dyn Publisher>,
    pub(crate) oracle: Arc<dyn HandRankOracle>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: ServiceConfig,
    pub(crate) ids: IdGenerator,
    registry: Mutex<HashMap<TableId, TableHandle>>,
}

impl Shared {
    fn registry(&self) -> MutexGuard<'_, HashMap<TableId, TableHandle>> {
        self.registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Сервис столов. Клонируется дёшево, все клоны работают с одними и теми же столами.
///
/// Методы, отправляющие сообщения актору, должны вызываться внутри tokio-рантайма.
#[derive(Clone)]
pub struct TableService {
    shared: Arc<Shared>,
}

impl TableService {
    pub fn new(
        config: ServiceConfig,
        store: Arc<dyn TableStore>,
        publisher: Arc<dyn Publisher>,
        oracle: Arc<dyn HandRankOracle>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                store,
                publisher,
                oracle,
                clock,
                config,
                ids: IdGenerator::new(),
                registry: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn rules(&self) -> &TimeRules {
        &self.shared.config.rules
    }

    /// Создать стол. Создатель становится владельцем, стол неактивен.
    /// Актор стола поднимается при первой команде.
    pub fn create_table(&self, owner: PlayerId, command: CreateTableCommand) -> Result<TableId, ApiError> {
        let config = command.to_config().map_err(ApiError::BadRequest)?;
        let id = self.shared.ids.next_table_id();
        let mut table = Table::new(id, command.name.clone(), owner, config);
        self.shared.store.save(&mut table)?;
        info!(table_id = id, owner, name = %command.name, "table created");
        Ok(id)
    }

    /// Отправить команду и дождаться, пока актор её обработает.
    pub async fn command(&self, table_id: TableId, actor: PlayerId, command: Command) -> Result<(), ApiError> {
        let handle = self.handle(table_id)?;
        handle.command(actor, command, table_id).await
    }

    /// Дождаться, пока актор стола разберёт всё, что уже лежит в ящике.
    pub async fn sync(&self, table_id: TableId) -> Result<(), ApiError> {
        let handle = self.handle(table_id)?;
        handle.sync(table_id).await
    }

    /// Вид стола глазами `viewer` (`None` – гость). Последнее сохранённое состояние.
    pub fn view(&self, table_id: TableId, viewer: Option<PlayerId>) -> Result<TableView, ApiError> {
        let table = self.shared.store.load(table_id)?;
        Ok(build_table_view(&table, viewer))
    }

    /// Заявки на места. Видит только владелец.
    pub fn ingress_requests(&self, table_id: TableId, actor: PlayerId) -> Result<Vec<IngressRequestView>, ApiError> {
        let table = self.shared.store.load(table_id)?;
        if !table.is_owner(actor) {
            return Err(ApiError::Forbidden);
        }
        Ok(self
            .shared
            .store
            .ingress_for_table(table_id)
            .iter()
            .map(build_ingress_view)
            .collect())
    }

    pub fn table_ids(&self) -> Vec<TableId> {
        self.shared.store.table_ids()
    }

    /// Ручка актора. Если стол есть в хранилище, но актор не запущен (например,
    /// после рестарта поверх постоянного хранилища), актор поднимается здесь.
    fn handle(&self, table_id: TableId) -> Result<TableHandle, ApiError> {
        if let Some(handle) = self.shared.registry().get(&table_id) {
            return Ok(handle.clone());
        }
        self.shared.store.load(table_id)?;
        Ok(self.spawn(table_id))
    }

    fn spawn(&self, table_id: TableId) -> TableHandle {
        let mut registry = self.shared.registry();
        registry
            .entry(table_id)
            .or_insert_with(|| actor::spawn_table_actor(table_id, Arc::clone(&self.shared)))
            .clone()
    }
}
