use actix_web::{HttpResponse, http::StatusCode};
use sea_orm::DbErr;
use thiserror::Error;

/// Error kinds surfaced by the service layer. Each variant maps to a
/// structured JSON response at the HTTP boundary; none of them should ever
/// escape as an unhandled fault.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("verification token expired")]
    Expired,

    #[error("{0} was modified concurrently, re-fetch and retry")]
    StaleState(&'static str),

    #[error("{0} already registered")]
    UniqueViolation(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("mail delivery failed: {0}")]
    Mail(String),
}

impl ServiceError {
    /// Short machine-readable code included in the JSON body so clients can
    /// react without parsing the message (e.g. offer "resend activation"
    /// on `expired` rather than on `not_found`).
    fn code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Expired => "expired",
            ServiceError::StaleState(_) => "stale_state",
            ServiceError::UniqueViolation(_) => "unique_violation",
            ServiceError::Validation(_) => "validation_failure",
            ServiceError::Database(_) => "database_error",
            ServiceError::Mail(_) => "mail_failure",
        }
    }
}

impl actix_web::ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Expired => StatusCode::GONE,
            ServiceError::StaleState(_) => StatusCode::CONFLICT,
            ServiceError::UniqueViolation(_) => StatusCode::CONFLICT,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Mail(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "code": self.code(),
            "error": self.to_string(),
        }))
    }
}
