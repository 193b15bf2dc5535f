use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::{IngressRequestId, TableId};

/// Генерация ID на монотонных счётчиках.
/// Id игроков приходят снаружи (авторизация вне крейта), поэтому их здесь нет.
#[derive(Debug)]
pub struct IdGenerator {
    table_counter: AtomicU64,
    ingress_counter: AtomicU64,
}

impl IdGenerator {
    /// Создать генератор с начальным значением 1 для всех сущностей.
    pub fn new() -> Self {
        Self {
            table_counter: AtomicU64::new(1),
            ingress_counter: AtomicU64::new(1),
        }
    }

    #[inline]
    pub fn next_table_id(&self) -> TableId {
        self.table_counter.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn next_ingress_id(&self) -> IngressRequestId {
        self.ingress_counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
