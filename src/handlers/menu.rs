use std::str::FromStr;

use actix_web::{web, HttpRequest, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::identity::View;
use crate::domain::menu::MenuItem;
use crate::errors::AppError;
use crate::state::AppState;

use super::{authorize, money};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuItemResponse {
    pub id: i64,
    pub name: String,
    pub price: String,
    pub image: String,
}

impl From<&MenuItem> for MenuItemResponse {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            price: money(&item.price),
            image: item.image.clone(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PutMenuItemRequest {
    pub name: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.50"
    pub price: String,
    pub image: String,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /menu
///
/// Returns the menu, seeding the default items into an empty store first.
#[utoipa::path(
    get,
    path = "/menu",
    responses(
        (status = 200, description = "Menu items by id", body = [MenuItemResponse]),
        (status = 401, description = "Not logged in"),
        (status = 503, description = "Storage unavailable"),
    ),
    tag = "menu"
)]
pub async fn list_menu(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    authorize(&state, &req, View::Customer).await?;

    let items = state.menu.load_or_seed().await?;
    let body: Vec<MenuItemResponse> = items.iter().map(MenuItemResponse::from).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// PUT /menu/{id}
///
/// Inserts or replaces the menu item with this id.
#[utoipa::path(
    put,
    path = "/menu/{id}",
    params(
        ("id" = i64, Path, description = "Menu item id"),
    ),
    request_body = PutMenuItemRequest,
    responses(
        (status = 200, description = "Menu item stored", body = MenuItemResponse),
        (status = 400, description = "Invalid menu item"),
        (status = 403, description = "Kitchen staff only"),
    ),
    tag = "menu"
)]
pub async fn put_menu_item(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<PutMenuItemRequest>,
) -> Result<HttpResponse, AppError> {
    authorize(&state, &req, View::Kitchen).await?;

    let id = path.into_inner();
    let body = body.into_inner();
    let price = BigDecimal::from_str(&body.price)
        .map_err(|e| AppError::BadRequest(format!("Invalid price '{}': {}", body.price, e)))?;

    let item = MenuItem::new(id, body.name, price, body.image)?;
    state.menu.put_menu_item(&item).await?;

    Ok(HttpResponse::Ok().json(MenuItemResponse::from(&item)))
}
