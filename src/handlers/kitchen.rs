use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::kitchen::{self, KitchenTicket, TicketLine};
use crate::domain::identity::View;
use crate::errors::AppError;
use crate::state::AppState;

use super::{authorize, money};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketLineResponse {
    pub menu_item_id: i64,
    pub label: String,
    pub quantity: u32,
    /// Absent when the item is no longer on the menu.
    pub line_total: Option<String>,
}

impl From<TicketLine> for TicketLineResponse {
    fn from(line: TicketLine) -> Self {
        Self {
            menu_item_id: line.menu_item_id,
            label: line.label,
            quantity: line.quantity,
            line_total: line.line_total.as_ref().map(money),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KitchenTicketResponse {
    pub order_id: i64,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub lines: Vec<TicketLineResponse>,
    pub total: String,
    /// Status to send to `POST /orders/{id}/status`, absent once served.
    pub next_status: Option<String>,
}

impl From<KitchenTicket> for KitchenTicketResponse {
    fn from(ticket: KitchenTicket) -> Self {
        Self {
            order_id: ticket.order_id,
            status: ticket.status.to_string(),
            timestamp: ticket.timestamp,
            lines: ticket.lines.into_iter().map(TicketLineResponse::from).collect(),
            total: money(&ticket.total),
            next_status: ticket.next_status.map(|s| s.to_string()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KitchenBoardResponse {
    pub tickets: Vec<KitchenTicketResponse>,
    /// Seconds the screen should wait before fetching the board again.
    pub refresh_secs: u64,
}

/// GET /kitchen/board
///
/// Every order with item names and totals resolved against the current menu.
#[utoipa::path(
    get,
    path = "/kitchen/board",
    responses(
        (status = 200, description = "Kitchen board", body = KitchenBoardResponse),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Kitchen staff only"),
        (status = 503, description = "Storage unavailable"),
    ),
    tag = "kitchen"
)]
pub async fn board(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    authorize(&state, &req, View::Kitchen).await?;

    let orders = state.orders.list_orders().await?;
    let menu = state.menu.get_all_menu_items().await?;

    let tickets = kitchen::board(&orders, &menu)
        .into_iter()
        .map(KitchenTicketResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(KitchenBoardResponse {
        tickets,
        refresh_secs: state.kitchen_refresh.as_secs(),
    }))
}
