pub mod kitchen;
pub mod menu_service;
pub mod order_service;
pub mod session;

pub use menu_service::MenuService;
pub use order_service::OrderService;
pub use session::{IdentityProvider, Session, SessionRegistry};
