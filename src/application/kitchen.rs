//! Read model for the kitchen screen.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use crate::domain::menu::{display_name, MenuItem, MenuItemId};
use crate::domain::order::{line_total, Order, OrderId, OrderStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct TicketLine {
    pub menu_item_id: MenuItemId,
    pub label: String,
    pub quantity: u32,
    /// `None` when the menu item no longer exists.
    pub line_total: Option<BigDecimal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KitchenTicket {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
    pub lines: Vec<TicketLine>,
    pub total: BigDecimal,
    /// Status the kitchen can move the order to next.
    pub next_status: Option<OrderStatus>,
}

pub fn ticket(order: &Order, menu: &[MenuItem]) -> KitchenTicket {
    let lines = order
        .items
        .iter()
        .map(|item| TicketLine {
            menu_item_id: item.menu_item_id,
            label: display_name(menu, item.menu_item_id),
            quantity: item.quantity,
            line_total: line_total(menu, item.menu_item_id, item.quantity),
        })
        .collect();

    KitchenTicket {
        order_id: order.id,
        status: order.status,
        timestamp: order.timestamp,
        lines,
        total: order.total(menu),
        next_status: order.status.successor(),
    }
}

pub fn board(orders: &[Order], menu: &[MenuItem]) -> Vec<KitchenTicket> {
    orders.iter().map(|order| ticket(order, menu)).collect()
}
