pub mod kitchen;
pub mod menu;
pub mod orders;
pub mod session;

use actix_web::http::header;
use actix_web::HttpRequest;
use bigdecimal::{BigDecimal, RoundingMode};
use uuid::Uuid;

use crate::domain::identity::{Identity, View};
use crate::errors::AppError;
use crate::state::AppState;

/// Token from an `Authorization: Bearer <uuid>` header.
pub(crate) fn bearer_token(req: &HttpRequest) -> Option<Uuid> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .and_then(|token| Uuid::parse_str(token.trim()).ok())
}

/// Resolves the caller's session and checks it may open `view`.
pub(crate) async fn authorize(
    state: &AppState,
    req: &HttpRequest,
    view: View,
) -> Result<Identity, AppError> {
    let token = bearer_token(req).ok_or(AppError::Unauthorized)?;
    let identity = state
        .sessions
        .current(token)
        .await
        .ok_or(AppError::Unauthorized)?;
    if !identity.can_access(view) {
        log::warn!("{} ({}) denied access to {:?}", identity.username, identity.role, view);
        return Err(AppError::Forbidden);
    }
    Ok(identity)
}

/// Money as a decimal string with two places, e.g. `"28.00"`. Extra places
/// round half up.
pub(crate) fn money(amount: &BigDecimal) -> String {
    amount.with_scale_round(2, RoundingMode::HalfUp).to_string()
}
