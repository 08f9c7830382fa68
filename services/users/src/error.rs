//! Error types for the users service
//!
//! `ServiceError` is what the persistence layer returns; `RpcError` is what
//! goes over the wire. The route handlers are the only place that turns one
//! into the other.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failure of a persistence operation
#[derive(Error, Debug)]
pub enum ServiceError {
    /// No row matched the lookup or mutation target
    #[error("user {0} not found")]
    NotFound(i64),

    /// Any other store fault: constraint violation, connectivity, decoding
    #[error("failed to {action}: {source}")]
    Store {
        action: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl ServiceError {
    pub(crate) fn store(action: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Store { action, source }
    }

    /// True when the store rejected the write because of a unique constraint
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Store { source, .. } => source
                .as_database_error()
                .is_some_and(|e| e.is_unique_violation()),
            Self::NotFound(_) => false,
        }
    }
}

/// Type alias for persistence results
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error returned to RPC callers, rendered as `{"code": ..., "message": ...}`
#[derive(Error, Debug)]
pub enum RpcError {
    /// The request body could not be decoded
    #[error("{0}")]
    InvalidArgument(String),

    /// The requested user does not exist
    #[error("{0}")]
    NotFound(String),

    /// Any other failure
    #[error("{0}")]
    Internal(String),
}

impl RpcError {
    /// Connect protocol code name
    pub fn code(&self) -> &'static str {
        match self {
            RpcError::InvalidArgument(_) => "invalid_argument",
            RpcError::NotFound(_) => "not_found",
            RpcError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RpcError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            RpcError::NotFound(_) => StatusCode::NOT_FOUND,
            RpcError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for RpcError {
    fn from(rejection: JsonRejection) -> Self {
        RpcError::InvalidArgument(rejection.body_text())
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "code": self.code(),
            "message": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_error_codes_and_statuses() {
        let cases = [
            (RpcError::InvalidArgument("x".into()), "invalid_argument", 400),
            (RpcError::NotFound("x".into()), "not_found", 404),
            (RpcError::Internal("x".into()), "internal", 500),
        ];

        for (err, code, status) in cases {
            assert_eq!(err.code(), code);
            assert_eq!(err.status().as_u16(), status);
        }
    }

    #[test]
    fn test_service_error_messages_keep_the_cause() {
        let err = ServiceError::store("count users")(sqlx::Error::PoolTimedOut);
        assert!(err.to_string().starts_with("failed to count users: "));
        assert!(!err.is_conflict());

        assert_eq!(ServiceError::NotFound(7).to_string(), "user 7 not found");
    }
}
