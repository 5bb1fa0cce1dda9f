use bigdecimal::BigDecimal;

use super::errors::DomainError;

pub type MenuItemId = i64;

#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub price: BigDecimal,
    pub image: String,
}

impl MenuItem {
    /// Creates a validated menu item.
    ///
    /// The id must be positive, the name non-blank and the price non-negative.
    pub fn new(
        id: MenuItemId,
        name: impl Into<String>,
        price: BigDecimal,
        image: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let item = Self {
            id,
            name: name.into(),
            price,
            image: image.into(),
        };
        item.validate()?;
        Ok(item)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id <= 0 {
            return Err(DomainError::InvalidInput(format!(
                "menu item id must be positive, got {}",
                self.id
            )));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "menu item name must not be empty".to_string(),
            ));
        }
        if self.price < BigDecimal::from(0) {
            return Err(DomainError::InvalidInput(format!(
                "menu item price must not be negative, got {}",
                self.price
            )));
        }
        Ok(())
    }
}

/// Label shown for an order line. Unknown ids degrade to `Item #<id>`.
pub fn display_name(menu: &[MenuItem], menu_item_id: MenuItemId) -> String {
    menu.iter()
        .find(|m| m.id == menu_item_id)
        .map(|m| m.name.clone())
        .unwrap_or_else(|| format!("Item #{}", menu_item_id))
}

/// Items written to an empty store on first load.
pub fn default_menu() -> Vec<MenuItem> {
    [
        (1, "Burger", 10, "photo-1568901346375-23c9450c58cd"),
        (2, "Pizza", 12, "photo-1565299624946-b28f40a0ae38"),
        (3, "Salade", 8, "photo-1512621776951-a57141f2eefd"),
        (4, "Frites", 4, "photo-1630384060421-cb20d0e0649d"),
        (5, "Boisson", 2, "photo-1513558161293-cdaf765ed2fd"),
    ]
    .into_iter()
    .map(|(id, name, price, photo)| MenuItem {
        id,
        name: name.to_string(),
        price: BigDecimal::from(price),
        image: format!(
            "https://images.unsplash.com/{}?ixlib=rb-1.2.1&auto=format&fit=crop&w=300&q=80",
            photo
        ),
    })
    .collect()
}
