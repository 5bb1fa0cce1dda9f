use std::io;
use std::sync::Arc;

use actix_web::web;
use dotenvy::dotenv;
use restaurant_orders::state::SharedStorage;
use restaurant_orders::{
    build_server, AppState, Config, InMemoryCredentials, InMemoryStore, SqliteStore, StorageKind,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let storage: SharedStorage = match config.storage {
        StorageKind::Sqlite => {
            log::info!("Using SQLite storage at {}", config.database_url);
            Arc::new(SqliteStore::new(&config.database_url))
        }
        StorageKind::Memory => {
            log::info!("Using in-memory storage");
            Arc::new(InMemoryStore::new())
        }
    };

    let state = web::Data::new(AppState::new(
        storage,
        Arc::new(InMemoryCredentials::with_defaults()),
        config.kitchen_refresh,
        config.session_idle,
    ));

    // The server still starts when storage is down; requests report 503.
    match state.menu.load_or_seed().await {
        Ok(items) => log::info!("Menu ready with {} items", items.len()),
        Err(e) => log::error!("Could not load the menu: {}", e),
    }

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(state, &config.host, config.port)?.await
}
