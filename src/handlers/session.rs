use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::identity::{Identity, Role, View};
use crate::errors::AppError;
use crate::state::AppState;

use super::{authorize, bearer_token};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Send back as `Authorization: Bearer <token>`.
    pub token: Uuid,
    pub username: String,
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IdentityResponse {
    pub username: String,
    /// `user` or `admin`.
    pub role: String,
}

impl From<Identity> for IdentityResponse {
    fn from(identity: Identity) -> Self {
        Self {
            username: identity.username,
            role: identity.role.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    /// `user` (default) or `admin`.
    #[serde(default)]
    pub role: Option<String>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /session
///
/// Checks the credentials and opens a session. Unknown users and wrong
/// passwords get the same 401.
#[utoipa::path(
    post,
    path = "/session",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "session"
)]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let (token, identity) = state
        .sessions
        .open(&state.identities, &body.username, &body.password)
        .await
        .inspect_err(|_| log::warn!("Failed login for '{}'", body.username))?;

    log::info!("{} logged in as {}", identity.username, identity.role);

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        username: identity.username,
        role: identity.role.to_string(),
    }))
}

/// GET /session
#[utoipa::path(
    get,
    path = "/session",
    responses(
        (status = 200, description = "Current identity", body = IdentityResponse),
        (status = 401, description = "No live session"),
    ),
    tag = "session"
)]
pub async fn current_session(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let token = bearer_token(&req).ok_or(AppError::Unauthorized)?;
    let identity = state
        .sessions
        .current(token)
        .await
        .ok_or(AppError::Unauthorized)?;

    Ok(HttpResponse::Ok().json(IdentityResponse::from(identity)))
}

/// DELETE /session
///
/// Logs out. Unknown or missing tokens are not an error.
#[utoipa::path(
    delete,
    path = "/session",
    responses((status = 204, description = "Session cleared")),
    tag = "session"
)]
pub async fn clear_session(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    if let Some(token) = bearer_token(&req) {
        if state.sessions.close(token).await {
            log::info!("Session {} closed", token);
        }
    }
    HttpResponse::NoContent().finish()
}

/// POST /users
///
/// Anyone may register a `user` account. Creating an `admin` account requires
/// the caller to hold an admin session.
#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = IdentityResponse),
        (status = 400, description = "Missing username/password or unknown role"),
        (status = 401, description = "Admin account requested without a session"),
        (status = 403, description = "Admin account requested by a non-admin"),
        (status = 409, description = "Username already taken"),
    ),
    tag = "session"
)]
pub async fn register(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let role = match body.role.as_deref() {
        Some(role) => role.parse::<Role>()?,
        None => Role::User,
    };
    if role == Role::Admin {
        authorize(&state, &req, View::Kitchen).await?;
    }

    let identity = state
        .identities
        .register(&body.username, &body.password, role)
        .await?;

    Ok(HttpResponse::Created().json(IdentityResponse::from(identity)))
}
