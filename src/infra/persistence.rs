use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;

use crate::domain::table::{IngressRequest, Table};
use crate::domain::{IngressRequestId, TableId};

/// Ошибки хранилища.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Стол {0} не найден в хранилище")]
    NotFound(TableId),

    #[error("Заявка {0} не найдена в хранилище")]
    IngressNotFound(IngressRequestId),

    #[error("Конфликт версий стола: ожидалась {expected}, в хранилище {found}")]
    Conflict { expected: u64, found: u64 },
}

/// Хранилище столов и заявок на места.
///
/// Ядро требует только атомарные load/save агрегата стола по id.
/// `save` – compare-and-swap по `Table::version`: при успехе версия растёт на 1.
pub trait TableStore: Send + Sync {
    fn load(&self, id: TableId) -> Result<Table, StoreError>;

    /// Сохранить стол. Новый стол (нет в хранилище) сохраняется с версией 0.
    fn save(&self, table: &mut Table) -> Result<(), StoreError>;

    fn table_ids(&self) -> Vec<TableId>;

    fn insert_ingress(&self, request: IngressRequest);

    fn get_ingress(&self, id: IngressRequestId) -> Result<IngressRequest, StoreError>;

    /// Забрать заявку (approve/deny): она удаляется из хранилища.
    fn take_ingress(&self, id: IngressRequestId) -> Result<IngressRequest, StoreError>;

    fn ingress_for_table(&self, table_id: TableId) -> Vec<IngressRequest>;
}

#[derive(Debug, Default)]
struct Inner {
    tables: HashMap<TableId, Table>,
    ingress: HashMap<IngressRequestId, IngressRequest>,
}

/// Простая in-memory реализация для тестов и локального запуска.
#[derive(Debug, Default)]
pub struct InMemoryTableStore {
    inner: Mutex<Inner>,
}

impl InMemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Отравленный мьютекс: данные внутри целые, паника была у другого потока.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TableStore for InMemoryTableStore {
    fn load(&self, id: TableId) -> Result<Table, StoreError> {
        self.lock().tables.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    fn save(&self, table: &mut Table) -> Result<(), StoreError> {
        let mut inner = self.lock();
        match inner.tables.get(&table.id) {
            Some(stored) if stored.version != table.version => {
                return Err(StoreError::Conflict {
                    expected: table.version,
                    found: stored.version,
                });
            }
            Some(_) => table.version += 1,
            None => {}
        }
        inner.tables.insert(table.id, table.clone());
        Ok(())
    }

    fn table_ids(&self) -> Vec<TableId> {
        let mut ids: Vec<TableId> = self.lock().tables.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn insert_ingress(&self, request: IngressRequest) {
        self.lock().ingress.insert(request.id, request);
    }

    fn get_ingress(&self, id: IngressRequestId) -> Result<IngressRequest, StoreError> {
        self.lock()
            .ingress
            .get(&id)
            .cloned()
            .ok_or(StoreError::IngressNotFound(id))
    }

    fn take_ingress(&self, id: IngressRequestId) -> Result<IngressRequest, StoreError> {
        self.lock()
            .ingress
            .remove(&id)
            .ok_or(StoreError::IngressNotFound(id))
    }

    fn ingress_for_table(&self, table_id: TableId) -> Vec<IngressRequest> {
        let mut requests: Vec<IngressRequest> = self
            .lock()
            .ingress
            .values()
            .filter(|r| r.table_id == table_id)
            .cloned()
            .collect();
        requests.sort_by_key(|r| r.id);
        requests
    }
}
