use crate::domain::errors::DomainError;
use crate::domain::menu::{default_menu, MenuItem};
use crate::domain::ports::Storage;

pub struct MenuService<S> {
    storage: S,
}

impl<S: Storage> MenuService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// All menu items, by id.
    pub async fn get_all_menu_items(&self) -> Result<Vec<MenuItem>, DomainError> {
        let mut items = self.storage.get_all_menu_items().await?;
        items.sort_by_key(|m| m.id);
        Ok(items)
    }

    pub async fn put_menu_item(&self, item: &MenuItem) -> Result<(), DomainError> {
        item.validate()?;
        self.storage.put_menu_item(item).await
    }

    /// Returns the menu, writing the default items first if the store has none.
    pub async fn load_or_seed(&self) -> Result<Vec<MenuItem>, DomainError> {
        let items = self.get_all_menu_items().await?;
        if !items.is_empty() {
            return Ok(items);
        }

        let defaults = default_menu();
        for item in &defaults {
            self.storage.put_menu_item(item).await?;
        }
        log::info!("Seeded empty menu with {} default items", defaults.len());
        Ok(defaults)
    }
}
