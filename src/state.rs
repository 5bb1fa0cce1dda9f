use std::sync::Arc;
use std::time::Duration;

use crate::application::{IdentityProvider, MenuService, OrderService, SessionRegistry};
use crate::domain::ports::{CredentialProvider, Storage};

pub type SharedStorage = Arc<dyn Storage>;
pub type SharedCredentials = Arc<dyn CredentialProvider>;

/// Everything the HTTP handlers need, shared across workers.
pub struct AppState {
    pub menu: MenuService<SharedStorage>,
    pub orders: OrderService<SharedStorage>,
    pub identities: IdentityProvider<SharedCredentials>,
    pub sessions: SessionRegistry,
    pub kitchen_refresh: Duration,
}

impl AppState {
    pub fn new(
        storage: SharedStorage,
        credentials: SharedCredentials,
        kitchen_refresh: Duration,
        session_idle: Duration,
    ) -> Self {
        Self {
            menu: MenuService::new(Arc::clone(&storage)),
            orders: OrderService::new(storage),
            identities: IdentityProvider::new(credentials),
            sessions: SessionRegistry::new(session_idle),
            kitchen_refresh,
        }
    }
}
