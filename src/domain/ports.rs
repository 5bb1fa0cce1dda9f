use std::sync::Arc;

use async_trait::async_trait;

use super::errors::DomainError;
use super::identity::Role;
use super::menu::MenuItem;
use super::order::{Order, OrderId};

/// Persistence for menu items and orders, each keyed by id.
///
/// Implementations create their schema lazily on first use. `init` may be
/// called any number of times, concurrently, and performs the setup once.
/// Every `put` is all-or-nothing for its record. When the backend cannot be
/// reached, operations fail with [`DomainError::StorageUnavailable`].
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    async fn init(&self) -> Result<(), DomainError>;
    async fn get_all_menu_items(&self) -> Result<Vec<MenuItem>, DomainError>;
    async fn put_menu_item(&self, item: &MenuItem) -> Result<(), DomainError>;
    async fn get_all_orders(&self) -> Result<Vec<Order>, DomainError>;
    async fn put_order(&self, order: &Order) -> Result<(), DomainError>;
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, DomainError>;
}

/// Source of username/password pairs and their roles.
#[async_trait]
pub trait CredentialProvider: Send + Sync + 'static {
    /// Role for a matching pair, `None` on any mismatch.
    async fn verify(&self, username: &str, password: &str) -> Option<Role>;

    async fn register(&self, username: &str, _password: &str, _role: Role) -> Result<(), DomainError> {
        Err(DomainError::InvalidInput(format!(
            "cannot register '{}': registration is not supported",
            username
        )))
    }
}

#[async_trait]
impl<T: Storage + ?Sized> Storage for Arc<T> {
    async fn init(&self) -> Result<(), DomainError> {
        (**self).init().await
    }

    async fn get_all_menu_items(&self) -> Result<Vec<MenuItem>, DomainError> {
        (**self).get_all_menu_items().await
    }

    async fn put_menu_item(&self, item: &MenuItem) -> Result<(), DomainError> {
        (**self).put_menu_item(item).await
    }

    async fn get_all_orders(&self) -> Result<Vec<Order>, DomainError> {
        (**self).get_all_orders().await
    }

    async fn put_order(&self, order: &Order) -> Result<(), DomainError> {
        (**self).put_order(order).await
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        (**self).get_order(id).await
    }
}

#[async_trait]
impl<T: CredentialProvider + ?Sized> CredentialProvider for Arc<T> {
    async fn verify(&self, username: &str, password: &str) -> Option<Role> {
        (**self).verify(username, password).await
    }

    async fn register(&self, username: &str, password: &str, role: Role) -> Result<(), DomainError> {
        (**self).register(username, password, role).await
    }
}
