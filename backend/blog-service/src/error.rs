/// Error types for Blog Service
///
/// Every failure a resolver or handler can surface is a `BlogError`.
/// GraphQL responses carry the status code and validation details in
/// `extensions` (resolvers convert with `ResultExt::extend`); the REST
/// routes render the same information as JSON.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use async_graphql::ErrorExtensions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for blog-service operations
pub type Result<T> = std::result::Result<T, BlogError>;

/// A single failed input rule, reported back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub message: String,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("Invalid input")]
    Validation(Vec<FieldError>),

    #[error("Not authenticated")]
    Unauthenticated,

    /// Authentication was attempted but the identity could not be confirmed
    /// (unknown user, wrong password, acting user no longer exists).
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl BlogError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BlogError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BlogError::Unauthenticated | BlogError::InvalidCredentials(_) => {
                StatusCode::UNAUTHORIZED
            }
            BlogError::Forbidden(_) => StatusCode::FORBIDDEN,
            BlogError::NotFound(_) => StatusCode::NOT_FOUND,
            BlogError::Conflict(_) => StatusCode::CONFLICT,
            BlogError::BadRequest(_) => StatusCode::BAD_REQUEST,
            BlogError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            BlogError::Database(_) | BlogError::Token(_) | BlogError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to clients. Internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            BlogError::Database(_) | BlogError::Token(_) => "An error occurred".to_string(),
            BlogError::Internal(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    /// Validation details, if any.
    pub fn data(&self) -> Option<&[FieldError]> {
        match self {
            BlogError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl ErrorExtensions for BlogError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.public_message()).extend_with(|_, e| {
            e.set("status", i32::from(self.status_code().as_u16()));
            if let Some(data) = self.data() {
                let details: Vec<async_graphql::Value> = data
                    .iter()
                    .map(|field| async_graphql::value!({ "message": field.message.clone() }))
                    .collect();
                e.set("data", async_graphql::Value::List(details));
            }
        })
    }
}

impl ResponseError for BlogError {
    fn status_code(&self) -> StatusCode {
        BlogError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = BlogError::status_code(self);
        let mut body = serde_json::json!({
            "message": self.public_message(),
            "status": status.as_u16(),
        });
        if let Some(data) = self.data() {
            body["data"] = serde_json::json!(data);
        }
        HttpResponse::build(status).json(body)
    }
}

// Conversions from external error types
impl From<sqlx::Error> for BlogError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {}", err);
        BlogError::Database(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for BlogError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::error!("JWT error: {}", err);
        BlogError::Token(err.to_string())
    }
}

impl From<std::io::Error> for BlogError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("I/O error: {}", err);
        BlogError::Internal("An error occurred".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            BlogError::Validation(vec![]).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(BlogError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            BlogError::InvalidCredentials("User not found".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            BlogError::Forbidden("nope".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            BlogError::NotFound("No post found".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            BlogError::BadRequest("Malformed upload".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            BlogError::PayloadTooLarge("too big".into()).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            BlogError::Database("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_database_details_not_leaked() {
        let err = BlogError::Database("relation \"users\" does not exist".into());
        assert_eq!(err.public_message(), "An error occurred");
    }

    #[test]
    fn test_graphql_extensions_carry_status_and_data() {
        let err = BlogError::Validation(vec![FieldError::new("E-Mail is invalid")]);
        let gql = err.extend();

        assert_eq!(gql.message, "Invalid input");
        let ext = serde_json::to_value(gql.extensions.expect("extensions")).unwrap();
        assert_eq!(ext["status"], 422);
        assert_eq!(ext["data"][0]["message"], "E-Mail is invalid");
    }

    #[test]
    fn test_graphql_extensions_omit_data_without_details() {
        let gql = BlogError::Unauthenticated.extend();
        let ext = serde_json::to_value(gql.extensions.expect("extensions")).unwrap();
        assert_eq!(ext["status"], 401);
        assert!(ext.get("data").is_none());
    }
}
