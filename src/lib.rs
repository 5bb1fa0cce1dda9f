pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;
pub mod state;

use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations};
use utoipa::OpenApi;

pub use config::{Config, StorageKind};
pub use db::{create_pool, DbPool};
pub use infrastructure::{InMemoryCredentials, InMemoryStore, SqliteStore};
pub use state::AppState;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::session::login,
        handlers::session::current_session,
        handlers::session::clear_session,
        handlers::session::register,
        handlers::menu::list_menu,
        handlers::menu::put_menu_item,
        handlers::orders::submit_order,
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::advance_status,
        handlers::kitchen::board,
    ),
    components(schemas(
        handlers::session::LoginRequest,
        handlers::session::LoginResponse,
        handlers::session::IdentityResponse,
        handlers::session::RegisterRequest,
        handlers::menu::MenuItemResponse,
        handlers::menu::PutMenuItemRequest,
        handlers::orders::CartEntryRequest,
        handlers::orders::SubmitOrderRequest,
        handlers::orders::OrderItemResponse,
        handlers::orders::OrderResponse,
        handlers::orders::AdvanceStatusRequest,
        handlers::kitchen::TicketLineResponse,
        handlers::kitchen::KitchenTicketResponse,
        handlers::kitchen::KitchenBoardResponse,
    )),
    tags(
        (name = "session", description = "Login and accounts"),
        (name = "menu", description = "Menu catalogue"),
        (name = "orders", description = "Order placement and status"),
        (name = "kitchen", description = "Kitchen screen"),
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Registers every endpoint. Shared by the server and by tests that build an
/// `App` in-process.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/session")
            .route(web::post().to(handlers::session::login))
            .route(web::get().to(handlers::session::current_session))
            .route(web::delete().to(handlers::session::clear_session)),
    )
    .route("/users", web::post().to(handlers::session::register))
    .route("/menu", web::get().to(handlers::menu::list_menu))
    .route("/menu/{id}", web::put().to(handlers::menu::put_menu_item))
    .service(
        web::scope("/orders")
            .service(
                web::resource("")
                    .route(web::post().to(handlers::orders::submit_order))
                    .route(web::get().to(handlers::orders::list_orders)),
            )
            .route("/{id}", web::get().to(handlers::orders::get_order))
            .route("/{id}/status", web::post().to(handlers::orders::advance_status)),
    )
    .route("/kitchen/board", web::get().to(handlers::kitchen::board))
    .route("/api-docs/openapi.json", web::get().to(openapi_json));
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: web::Data<AppState>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(routes)
    })
    .bind((host.to_string(), port))?
    .run())
}
