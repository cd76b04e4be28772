use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Failure outcomes of the payroll engine and its HTTP surface.
#[derive(Debug, Error)]
pub enum PayrollError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Authorization(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("storage failure: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl PayrollError {
    pub fn validation(msg: impl Into<String>) -> Self {
        PayrollError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        PayrollError::NotFound(msg.into())
    }

    /// Stable, machine-readable name used in response bodies and bulk reports.
    pub fn kind(&self) -> &'static str {
        match self {
            PayrollError::Validation(_) => "validation",
            PayrollError::NotFound(_) => "not_found",
            PayrollError::Authorization(_) => "authorization",
            PayrollError::Unauthenticated(_) => "unauthenticated",
            PayrollError::Persistence(_) => "persistence",
        }
    }

    /// Message safe to hand back to a client; storage details stay in the log.
    pub fn public_message(&self) -> String {
        match self {
            PayrollError::Persistence(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for PayrollError {
    fn status_code(&self) -> StatusCode {
        match self {
            PayrollError::Validation(_) => StatusCode::BAD_REQUEST,
            PayrollError::NotFound(_) => StatusCode::NOT_FOUND,
            PayrollError::Authorization(_) => StatusCode::FORBIDDEN,
            PayrollError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            PayrollError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let PayrollError::Persistence(e) = self {
            tracing::error!(error = %e, "Storage operation failed");
        }

        HttpResponse::build(self.status_code()).json(json!({
            "error": self.public_message(),
            "kind": self.kind(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_each_kind_to_its_status() {
        assert_eq!(
            PayrollError::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PayrollError::not_found("gone").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PayrollError::Authorization("Admin only".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            PayrollError::Unauthenticated("Missing token".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            PayrollError::Persistence(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn hides_storage_details_from_clients() {
        let err = PayrollError::Persistence(sqlx::Error::PoolTimedOut);
        assert_eq!(err.public_message(), "Internal Server Error");
        assert_eq!(err.kind(), "persistence");
    }
}
