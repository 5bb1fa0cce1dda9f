use thiserror::Error;

use super::order::{OrderId, OrderStatus};

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Order has no items")]
    EmptyOrder,
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),
    #[error("Authentication failed")]
    AuthenticationFailed,
    #[error("Username already taken: {0}")]
    UsernameTaken(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
