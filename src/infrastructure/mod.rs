pub mod credentials;
pub mod memory_store;
pub mod models;
pub mod sqlite_store;

pub use credentials::InMemoryCredentials;
pub use memory_store::InMemoryStore;
pub use sqlite_store::SqliteStore;
