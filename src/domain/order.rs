use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use super::errors::DomainError;
use super::menu::{MenuItem, MenuItemId};

pub type OrderId = i64;

/// Largest quantity a single order line may carry. Both storage backends
/// hold it as a 32-bit signed column.
pub const MAX_QUANTITY: u32 = i32::MAX as u32;

/// Kitchen-side progress of an order. Only moves forward, one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Ready,
    Served,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Ready => "ready",
            OrderStatus::Served => "served",
        }
    }

    /// The only status this one may move to, or `None` once served.
    pub fn successor(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Served),
            OrderStatus::Served => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.successor().is_none()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "ready" => Ok(OrderStatus::Ready),
            "served" => Ok(OrderStatus::Served),
            other => Err(DomainError::InvalidInput(format!(
                "unknown order status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
}

impl Order {
    /// Builds a fresh `pending` order from the positive entries of `cart`.
    pub fn from_cart(
        id: OrderId,
        cart: &Cart,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if cart.is_empty() {
            return Err(DomainError::EmptyOrder);
        }
        Ok(Self {
            id,
            items: cart.items(),
            status: OrderStatus::Pending,
            timestamp,
        })
    }

    /// Moves the order to `target` if it is the legal successor of the current status.
    pub fn advance_to(&mut self, target: OrderStatus) -> Result<(), DomainError> {
        if self.status.successor() != Some(target) {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        Ok(())
    }

    pub fn total(&self, menu: &[MenuItem]) -> BigDecimal {
        self.items.iter().fold(BigDecimal::from(0), |acc, item| {
            acc + line_total(menu, item.menu_item_id, item.quantity).unwrap_or_default()
        })
    }
}

/// Price of `quantity` units of a menu item, or `None` if the item is unknown.
pub fn line_total(
    menu: &[MenuItem],
    menu_item_id: MenuItemId,
    quantity: u32,
) -> Option<BigDecimal> {
    menu.iter()
        .find(|m| m.id == menu_item_id)
        .map(|m| m.price.clone() * BigDecimal::from(quantity))
}

/// Customer selection before submission. One entry per menu item, quantities
/// always positive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    entries: BTreeMap<MenuItemId, u32>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects raw `(menu_item_id, quantity)` pairs, summing duplicates and
    /// dropping non-positive quantities. Fails with `InvalidInput` when an
    /// entry, alone or summed, exceeds [`MAX_QUANTITY`].
    pub fn from_entries<I>(entries: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (MenuItemId, i64)>,
    {
        let mut cart = Self::new();
        for (id, quantity) in entries {
            if quantity <= 0 {
                continue;
            }
            let merged = i64::from(cart.quantity(id)).saturating_add(quantity);
            let merged = u32::try_from(merged)
                .ok()
                .filter(|q| *q <= MAX_QUANTITY)
                .ok_or_else(|| too_many(id))?;
            cart.entries.insert(id, merged);
        }
        Ok(cart)
    }

    /// Adds one unit; stays at [`MAX_QUANTITY`] once reached.
    pub fn add(&mut self, menu_item_id: MenuItemId) {
        let slot = self.entries.entry(menu_item_id).or_insert(0);
        *slot = (*slot + 1).min(MAX_QUANTITY);
    }

    pub fn remove(&mut self, menu_item_id: MenuItemId) {
        if let Some(quantity) = self.entries.get_mut(&menu_item_id) {
            if *quantity > 1 {
                *quantity -= 1;
            } else {
                self.entries.remove(&menu_item_id);
            }
        }
    }

    pub fn set(&mut self, menu_item_id: MenuItemId, quantity: u32) -> Result<(), DomainError> {
        if quantity > MAX_QUANTITY {
            return Err(too_many(menu_item_id));
        }
        if quantity == 0 {
            self.entries.remove(&menu_item_id);
        } else {
            self.entries.insert(menu_item_id, quantity);
        }
        Ok(())
    }

    pub fn quantity(&self, menu_item_id: MenuItemId) -> u32 {
        self.entries.get(&menu_item_id).copied().unwrap_or(0)
    }

    pub fn total_quantity(&self) -> u64 {
        self.entries.values().map(|q| u64::from(*q)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Items sorted by menu item id.
    pub fn items(&self) -> Vec<OrderItem> {
        self.entries
            .iter()
            .map(|(id, quantity)| OrderItem {
                menu_item_id: *id,
                quantity: *quantity,
            })
            .collect()
    }

    /// Sum of priced entries; entries missing from `menu` count as zero.
    pub fn total(&self, menu: &[MenuItem]) -> BigDecimal {
        self.entries.iter().fold(BigDecimal::from(0), |acc, (id, quantity)| {
            acc + line_total(menu, *id, *quantity).unwrap_or_default()
        })
    }
}

fn too_many(menu_item_id: MenuItemId) -> DomainError {
    DomainError::InvalidInput(format!(
        "quantity for menu item {} exceeds {}",
        menu_item_id, MAX_QUANTITY
    ))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use chrono::Utc;

    use super::*;

    fn item(id: MenuItemId, price: &str) -> MenuItem {
        MenuItem::new(id, format!("item {}", id), BigDecimal::from_str(price).unwrap(), "")
            .expect("valid menu item")
    }

    fn pending_order() -> Order {
        let mut cart = Cart::new();
        cart.add(1);
        Order::from_cart(1, &cart, Utc::now()).expect("non-empty cart")
    }

    #[test]
    fn successor_chain_is_linear() {
        assert_eq!(OrderStatus::Pending.successor(), Some(OrderStatus::Ready));
        assert_eq!(OrderStatus::Ready.successor(), Some(OrderStatus::Served));
        assert_eq!(OrderStatus::Served.successor(), None);
        assert!(OrderStatus::Served.is_terminal());
    }

    #[test]
    fn status_parses_lowercase_names() {
        for status in [OrderStatus::Pending, OrderStatus::Ready, OrderStatus::Served] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!(matches!(
            "PENDING".parse::<OrderStatus>(),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn advance_walks_forward_only() {
        let mut order = pending_order();
        order.advance_to(OrderStatus::Ready).expect("pending -> ready");
        order.advance_to(OrderStatus::Served).expect("ready -> served");

        let err = order.advance_to(OrderStatus::Ready).unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidTransition {
                from: OrderStatus::Served,
                to: OrderStatus::Ready
            }
        ));
    }

    #[test]
    fn advance_cannot_skip_ready() {
        let mut order = pending_order();
        assert!(matches!(
            order.advance_to(OrderStatus::Served),
            Err(DomainError::InvalidTransition { .. })
        ));
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn advance_rejects_same_status() {
        let mut order = pending_order();
        assert!(order.advance_to(OrderStatus::Pending).is_err());
    }

    #[test]
    fn from_cart_rejects_empty_cart() {
        let cart = Cart::from_entries([(1, 0), (2, -3)]).unwrap();
        assert!(matches!(
            Order::from_cart(7, &cart, Utc::now()),
            Err(DomainError::EmptyOrder)
        ));
    }

    #[test]
    fn cart_merges_duplicate_entries() {
        let cart = Cart::from_entries([(3, 1), (1, 2), (3, 2), (4, 0)]).unwrap();
        assert_eq!(
            cart.items(),
            vec![
                OrderItem { menu_item_id: 1, quantity: 2 },
                OrderItem { menu_item_id: 3, quantity: 3 },
            ]
        );
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn cart_remove_drops_entry_at_zero() {
        let mut cart = Cart::new();
        cart.add(2);
        cart.add(2);
        cart.remove(2);
        assert_eq!(cart.quantity(2), 1);
        cart.remove(2);
        assert_eq!(cart.quantity(2), 0);
        assert!(cart.is_empty());
        cart.remove(9);
        assert!(cart.is_empty());
    }

    #[test]
    fn cart_total_ignores_unknown_items() {
        let menu = vec![item(1, "10.00"), item(3, "8.00")];
        let mut cart = Cart::new();
        cart.set(1, 2).unwrap();
        cart.set(3, 1).unwrap();
        cart.set(99, 4).unwrap();
        assert_eq!(cart.total(&menu), BigDecimal::from_str("28.00").unwrap());
    }

    #[test]
    fn order_total_matches_cart_total() {
        let menu = vec![item(1, "10.00"), item(3, "8.00")];
        let cart = Cart::from_entries([(1, 2), (3, 1)]).unwrap();
        let order = Order::from_cart(1, &cart, Utc::now()).unwrap();
        assert_eq!(order.total(&menu), cart.total(&menu));
    }

    #[test]
    fn cart_rejects_quantities_beyond_storable_range() {
        assert!(matches!(
            Cart::from_entries([(1, 5_000_000_000)]),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(matches!(
            Cart::from_entries([(1, i64::from(MAX_QUANTITY)), (1, 1)]),
            Err(DomainError::InvalidInput(_))
        ));

        let cart = Cart::from_entries([(1, i64::from(MAX_QUANTITY))]).unwrap();
        assert_eq!(cart.quantity(1), MAX_QUANTITY);

        let mut cart = Cart::new();
        assert!(cart.set(2, MAX_QUANTITY + 1).is_err());
        cart.set(2, MAX_QUANTITY).unwrap();
        cart.add(2);
        assert_eq!(cart.quantity(2), MAX_QUANTITY);
    }
}
