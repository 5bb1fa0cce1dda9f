use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{OnceCell, RwLock};

use crate::domain::errors::DomainError;
use crate::domain::menu::{MenuItem, MenuItemId};
use crate::domain::order::{Order, OrderId};
use crate::domain::ports::Storage;

#[derive(Default)]
struct Tables {
    menu: HashMap<MenuItemId, MenuItem>,
    orders: HashMap<OrderId, Order>,
}

/// Process-local [`Storage`]. Contents vanish with the process.
pub struct InMemoryStore {
    tables: OnceCell<RwLock<Tables>>,
    available: bool,
    schema_creations: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: OnceCell::new(),
            available: true,
            schema_creations: AtomicUsize::new(0),
        }
    }

    /// A store whose backend is switched off; every operation fails with
    /// [`DomainError::StorageUnavailable`].
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// How many times the tables were created. Stays at 1 once initialized.
    pub fn schema_creations(&self) -> usize {
        self.schema_creations.load(Ordering::SeqCst)
    }

    async fn tables(&self) -> Result<&RwLock<Tables>, DomainError> {
        if !self.available {
            return Err(DomainError::StorageUnavailable(
                "in-memory store is disabled".to_string(),
            ));
        }
        Ok(self
            .tables
            .get_or_init(|| async {
                self.schema_creations.fetch_add(1, Ordering::SeqCst);
                // Suspend like a real backend so concurrent callers overlap.
                tokio::task::yield_now().await;
                log::info!("In-memory store initialized");
                RwLock::new(Tables::default())
            })
            .await)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for InMemoryStore {
    async fn init(&self) -> Result<(), DomainError> {
        self.tables().await.map(|_| ())
    }

    async fn get_all_menu_items(&self) -> Result<Vec<MenuItem>, DomainError> {
        let tables = self.tables().await?.read().await;
        Ok(tables.menu.values().cloned().collect())
    }

    async fn put_menu_item(&self, item: &MenuItem) -> Result<(), DomainError> {
        let mut tables = self.tables().await?.write().await;
        tables.menu.insert(item.id, item.clone());
        Ok(())
    }

    async fn get_all_orders(&self) -> Result<Vec<Order>, DomainError> {
        let tables = self.tables().await?.read().await;
        Ok(tables.orders.values().cloned().collect())
    }

    async fn put_order(&self, order: &Order) -> Result<(), DomainError> {
        let mut tables = self.tables().await?.write().await;
        tables.orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        let tables = self.tables().await?.read().await;
        Ok(tables.orders.get(&id).cloned())
    }
}
