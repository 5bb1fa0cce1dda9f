use std::str::FromStr;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::MigrationHarness;
use tokio::sync::OnceCell;

use crate::db::{create_pool, DbPool};
use crate::domain::errors::DomainError;
use crate::domain::menu::MenuItem;
use crate::domain::order::{Order, OrderId, OrderItem, OrderStatus};
use crate::domain::ports::Storage;
use crate::schema::{menu, order_items, orders};
use crate::MIGRATIONS;

use super::models::{MenuRow, OrderItemRow, OrderRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::StorageUnavailable(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::StorageUnavailable(e.to_string())
    }
}

impl From<tokio::task::JoinError> for DomainError {
    fn from(e: tokio::task::JoinError) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// SQLite-backed [`Storage`]. The pool is opened and migrated on first use.
pub struct SqliteStore {
    database_url: String,
    pool: OnceCell<DbPool>,
}

impl SqliteStore {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            pool: OnceCell::new(),
        }
    }

    async fn pool(&self) -> Result<&DbPool, DomainError> {
        self.pool
            .get_or_try_init(|| open_pool(self.database_url.clone()))
            .await
    }

    /// Runs blocking diesel work on the blocking thread pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, DomainError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool().await?.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn)
        })
        .await?
    }
}

async fn open_pool(database_url: String) -> Result<DbPool, DomainError> {
    tokio::task::spawn_blocking(move || {
        let pool = create_pool(&database_url).map_err(|e| {
            log::warn!("Cannot open SQLite store at {}: {}", database_url, e);
            DomainError::from(e)
        })?;
        let mut conn = pool.get()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DomainError::StorageUnavailable(e.to_string()))?
            .len();
        log::info!(
            "SQLite store ready at {} ({} migrations applied)",
            database_url,
            applied
        );
        drop(conn);
        Ok::<_, DomainError>(pool)
    })
    .await?
}

impl From<&MenuItem> for MenuRow {
    fn from(item: &MenuItem) -> Self {
        MenuRow {
            id: item.id,
            name: item.name.clone(),
            price: item.price.to_string(),
            image: item.image.clone(),
        }
    }
}

fn menu_item_from_row(row: MenuRow) -> Result<MenuItem, DomainError> {
    let price = BigDecimal::from_str(&row.price).map_err(|e| {
        DomainError::Internal(format!(
            "corrupt price '{}' for menu item {}: {}",
            row.price, row.id, e
        ))
    })?;
    Ok(MenuItem {
        id: row.id,
        name: row.name,
        price,
        image: row.image,
    })
}

fn order_from_rows(row: OrderRow, items: Vec<OrderItemRow>) -> Result<Order, DomainError> {
    let status = OrderStatus::from_str(&row.status).map_err(|_| {
        DomainError::Internal(format!("corrupt status '{}' for order {}", row.status, row.id))
    })?;
    let items = items
        .into_iter()
        .map(|i| {
            let quantity = u32::try_from(i.quantity).map_err(|_| {
                DomainError::Internal(format!(
                    "corrupt quantity {} in order {}",
                    i.quantity, row.id
                ))
            })?;
            Ok(OrderItem {
                menu_item_id: i.menu_item_id,
                quantity,
            })
        })
        .collect::<Result<Vec<_>, DomainError>>()?;
    Ok(Order {
        id: row.id,
        items,
        status,
        timestamp: row.created_at.and_utc(),
    })
}

fn order_to_rows(order: &Order) -> Result<(OrderRow, Vec<OrderItemRow>), DomainError> {
    let items = order
        .items
        .iter()
        .enumerate()
        .map(|(position, item)| {
            let quantity = i32::try_from(item.quantity).map_err(|_| {
                DomainError::InvalidInput(format!("quantity {} is too large", item.quantity))
            })?;
            let position = i32::try_from(position)
                .map_err(|_| DomainError::InvalidInput("too many order items".to_string()))?;
            Ok(OrderItemRow {
                order_id: order.id,
                position,
                menu_item_id: item.menu_item_id,
                quantity,
            })
        })
        .collect::<Result<Vec<_>, DomainError>>()?;
    let row = OrderRow {
        id: order.id,
        status: order.status.as_str().to_string(),
        created_at: order.timestamp.naive_utc(),
    };
    Ok((row, items))
}

#[async_trait]
impl Storage for SqliteStore {
    async fn init(&self) -> Result<(), DomainError> {
        self.pool().await.map(|_| ())
    }

    async fn get_all_menu_items(&self) -> Result<Vec<MenuItem>, DomainError> {
        self.with_conn(|conn| {
            menu::table
                .select(MenuRow::as_select())
                .load(conn)?
                .into_iter()
                .map(menu_item_from_row)
                .collect()
        })
        .await
    }

    async fn put_menu_item(&self, item: &MenuItem) -> Result<(), DomainError> {
        let row = MenuRow::from(item);
        self.with_conn(move |conn| {
            diesel::replace_into(menu::table).values(&row).execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn get_all_orders(&self) -> Result<Vec<Order>, DomainError> {
        self.with_conn(|conn| {
            let rows = orders::table.select(OrderRow::as_select()).load(conn)?;
            let items = OrderItemRow::belonging_to(&rows)
                .select(OrderItemRow::as_select())
                .order(order_items::position.asc())
                .load(conn)?;

            items
                .grouped_by(&rows)
                .into_iter()
                .zip(rows)
                .map(|(items, row)| order_from_rows(row, items))
                .collect()
        })
        .await
    }

    async fn put_order(&self, order: &Order) -> Result<(), DomainError> {
        let (row, items) = order_to_rows(order)?;
        self.with_conn(move |conn| {
            conn.transaction::<_, DomainError, _>(|conn| {
                // Children first: replacing the parent row deletes it.
                diesel::delete(order_items::table.filter(order_items::order_id.eq(row.id)))
                    .execute(conn)?;
                diesel::replace_into(orders::table).values(&row).execute(conn)?;
                if !items.is_empty() {
                    diesel::insert_into(order_items::table)
                        .values(&items)
                        .execute(conn)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        self.with_conn(move |conn| {
            let row = orders::table
                .find(id)
                .select(OrderRow::as_select())
                .first(conn)
                .optional()?;

            let Some(row) = row else {
                return Ok(None);
            };

            let items = OrderItemRow::belonging_to(&row)
                .select(OrderItemRow::as_select())
                .order(order_items::position.asc())
                .load(conn)?;

            order_from_rows(row, items).map(Some)
        })
        .await
    }
}
