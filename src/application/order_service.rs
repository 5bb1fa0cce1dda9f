use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::errors::DomainError;
use crate::domain::order::{Cart, Order, OrderId, OrderStatus};
use crate::domain::ports::Storage;

/// Creates orders and moves them through `pending → ready → served`.
///
/// All order reads and writes go through here so the transition rules cannot
/// be bypassed.
pub struct OrderService<S> {
    storage: S,
    ids: OrderIdSequence,
    transitions: Mutex<()>,
}

impl<S: Storage> OrderService<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            ids: OrderIdSequence::default(),
            transitions: Mutex::new(()),
        }
    }

    pub async fn submit_order(&self, cart: &Cart) -> Result<Order, DomainError> {
        if cart.is_empty() {
            return Err(DomainError::EmptyOrder);
        }

        let now = Utc::now();
        let id = self.ids.next(&self.storage, now).await?;
        let order = Order::from_cart(id, cart, now)?;
        self.storage.put_order(&order).await?;

        log::info!(
            "Order {} submitted with {} item(s)",
            order.id,
            order.items.len()
        );
        Ok(order)
    }

    pub async fn advance_status(
        &self,
        order_id: OrderId,
        target: OrderStatus,
    ) -> Result<Order, DomainError> {
        // One transition at a time, so a stale request cannot overwrite a newer status.
        let _guard = self.transitions.lock().await;

        let mut order = self
            .storage
            .get_order(order_id)
            .await?
            .ok_or(DomainError::OrderNotFound(order_id))?;

        let from = order.status;
        if let Err(e) = order.advance_to(target) {
            log::warn!("Rejected transition of order {}: {}", order_id, e);
            return Err(e);
        }
        self.storage.put_order(&order).await?;

        log::info!("Order {} moved from {} to {}", order_id, from, target);
        Ok(order)
    }

    /// Current snapshot, oldest order first.
    pub async fn list_orders(&self) -> Result<Vec<Order>, DomainError> {
        let mut orders = self.storage.get_all_orders().await?;
        orders.sort_by_key(|o| o.id);
        Ok(orders)
    }

    pub async fn get_order(&self, order_id: OrderId) -> Result<Order, DomainError> {
        self.storage
            .get_order(order_id)
            .await?
            .ok_or(DomainError::OrderNotFound(order_id))
    }
}

/// Hands out order ids derived from the creation time in milliseconds, bumped
/// past the previous id when two orders land in the same millisecond.
#[derive(Default)]
struct OrderIdSequence {
    last: Mutex<Option<OrderId>>,
}

impl OrderIdSequence {
    async fn next<S: Storage>(
        &self,
        storage: &S,
        now: DateTime<Utc>,
    ) -> Result<OrderId, DomainError> {
        let mut last = self.last.lock().await;
        let floor = match *last {
            Some(id) => id,
            None => storage
                .get_all_orders()
                .await?
                .iter()
                .map(|o| o.id)
                .max()
                .unwrap_or(0),
        };
        let id = now.timestamp_millis().max(floor + 1);
        *last = Some(id);
        Ok(id)
    }
}
