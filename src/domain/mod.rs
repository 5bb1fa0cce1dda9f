pub mod errors;
pub mod identity;
pub mod menu;
pub mod order;
pub mod ports;
