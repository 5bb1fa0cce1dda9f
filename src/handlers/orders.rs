use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::identity::View;
use crate::domain::order::{Cart, Order, OrderStatus};
use crate::errors::AppError;
use crate::state::AppState;

use super::authorize;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartEntryRequest {
    pub menu_item_id: i64,
    /// Entries with a quantity of zero or less are ignored; more than
    /// 2147483647 (summed per item) is rejected.
    pub quantity: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitOrderRequest {
    pub items: Vec<CartEntryRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub menu_item_id: i64,
    pub quantity: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub items: Vec<OrderItemResponse>,
    /// `pending`, `ready` or `served`.
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            items: order
                .items
                .into_iter()
                .map(|i| OrderItemResponse {
                    menu_item_id: i.menu_item_id,
                    quantity: i.quantity,
                })
                .collect(),
            status: order.status.to_string(),
            timestamp: order.timestamp,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdvanceStatusRequest {
    /// Must be the next status: `ready` after `pending`, `served` after `ready`.
    pub status: String,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Places a new `pending` order from the cart entries. Entries for the same
/// menu item are merged.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = SubmitOrderRequest,
    responses(
        (status = 201, description = "Order submitted", body = OrderResponse),
        (status = 400, description = "No item with a positive quantity, or a quantity too large"),
        (status = 401, description = "Not logged in"),
        (status = 503, description = "Storage unavailable"),
    ),
    tag = "orders"
)]
pub async fn submit_order(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<SubmitOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let identity = authorize(&state, &req, View::Customer).await?;

    let cart = Cart::from_entries(
        body.into_inner()
            .items
            .into_iter()
            .map(|e| (e.menu_item_id, e.quantity)),
    )?;
    let order = state.orders.submit_order(&cart).await?;
    log::debug!("Order {} placed by {}", order.id, identity.username);

    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /orders
///
/// Returns every order, oldest first.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "All orders", body = [OrderResponse]),
        (status = 403, description = "Kitchen staff only"),
        (status = 503, description = "Storage unavailable"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    authorize(&state, &req, View::Kitchen).await?;

    let orders: Vec<OrderResponse> = state
        .orders
        .list_orders()
        .await?
        .into_iter()
        .map(OrderResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(orders))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = i64, Path, description = "Order id"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 403, description = "Kitchen staff only"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    authorize(&state, &req, View::Kitchen).await?;

    let order = state.orders.get_order(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// POST /orders/{id}/status
///
/// Moves the order one step along `pending → ready → served`.
#[utoipa::path(
    post,
    path = "/orders/{id}/status",
    params(
        ("id" = i64, Path, description = "Order id"),
    ),
    request_body = AdvanceStatusRequest,
    responses(
        (status = 200, description = "Updated order", body = OrderResponse),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Not the next status"),
    ),
    tag = "orders"
)]
pub async fn advance_status(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<AdvanceStatusRequest>,
) -> Result<HttpResponse, AppError> {
    authorize(&state, &req, View::Kitchen).await?;

    let target: OrderStatus = body.status.parse()?;
    let order = state
        .orders
        .advance_status(path.into_inner(), target)
        .await?;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}
