use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Missing token")]
    Unauthorized,

    #[error("Token invalid or expired")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Error code carried in the `error` field of the response body
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::InvalidToken => "INVALID_TOKEN",
            ApiError::UserNotFound(_) => "USER_NOT_FOUND",
            ApiError::Storage(_) | ApiError::Internal(_) => "SERVER_ERROR",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::Unauthorized | ApiError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::UserNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Storage details stay in the logs
        let message = match self {
            ApiError::Storage(e) => {
                tracing::error!("Store operation failed: {}", e);
                "Request could not be completed".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.code(),
            "message": message
        }))
    }
}

impl From<fraud_engine::Error> for ApiError {
    fn from(err: fraud_engine::Error) -> Self {
        match err {
            fraud_engine::Error::InvalidInput(msg) => ApiError::InvalidInput(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::InvalidInput("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::UserNotFound("u1".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Storage(StoreError::Unavailable("down".into())).code(),
            "SERVER_ERROR"
        );
    }

    #[test]
    fn test_engine_error_maps_to_invalid_input() {
        let err: ApiError = fraud_engine::Error::InvalidInput("negative".into()).into();
        assert_eq!(err.code(), "INVALID_INPUT");
    }

    #[actix_web::test]
    async fn test_error_body_shape() {
        let resp = ApiError::InvalidCredentials.error_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "INVALID_CREDENTIALS");
        assert_eq!(json["message"], "Invalid username or password");
    }
}
