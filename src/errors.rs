use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::OrderNotFound(_) => AppError::NotFound(e.to_string()),
            DomainError::EmptyOrder | DomainError::InvalidInput(_) => {
                AppError::BadRequest(e.to_string())
            }
            DomainError::InvalidTransition { .. } | DomainError::UsernameTaken(_) => {
                AppError::Conflict(e.to_string())
            }
            DomainError::AuthenticationFailed => AppError::Unauthorized,
            DomainError::StorageUnavailable(msg) => AppError::Unavailable(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Unavailable(detail) => {
                log::error!("Storage unavailable: {}", detail);
                "Storage unavailable".to_string()
            }
            AppError::Internal(detail) => {
                log::error!("Internal error: {}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::OrderStatus;
    use actix_web::ResponseError;

    #[test]
    fn order_not_found_returns_404() {
        let err: AppError = DomainError::OrderNotFound(7).into();
        assert_eq!(err.error_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Order not found: 7");
    }

    #[test]
    fn empty_order_returns_400() {
        let err: AppError = DomainError::EmptyOrder.into();
        assert_eq!(err.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_transition_returns_409() {
        let err: AppError = DomainError::InvalidTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Served,
        }
        .into();
        assert_eq!(err.error_response().status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "Invalid transition from pending to served");
    }

    #[test]
    fn authentication_failure_returns_401() {
        let err: AppError = DomainError::AuthenticationFailed.into();
        assert!(matches!(err, AppError::Unauthorized));
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn storage_unavailable_returns_503() {
        let err: AppError = DomainError::StorageUnavailable("disk gone".to_string()).into();
        assert_eq!(err.error_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn internal_error_returns_500() {
        let err: AppError = DomainError::Internal("oops".to_string()).into();
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn forbidden_display() {
        assert_eq!(AppError::Forbidden.to_string(), "Forbidden");
    }
}
