use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::validation::ValidationError;

/// Every failure the HTTP surface can report
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required fields: text, from, and to languages are required")]
    MissingTranslateFields,
    #[error("Invalid image: {0}")]
    InvalidImage(#[from] ValidationError),
    #[error("Translation failed: {0}")]
    TranslationFailed(String),
    #[error("OCR processing failed: {0}")]
    OcrFailed(String),
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Too many requests, please try again later.")]
    TooManyRequests { retry_after_secs: u64 },
    #[error("Request body must be a JSON object")]
    InvalidBody,
    #[error("Request body exceeds the size limit")]
    BodyTooLarge,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::BodyTooLarge
        } else {
            ApiError::InvalidBody
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingTranslateFields | ApiError::InvalidImage(_) | ApiError::InvalidBody => {
                StatusCode::BAD_REQUEST
            }
            ApiError::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::OcrFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::TranslationFailed(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        }

        let body = match &self {
            ApiError::MissingTranslateFields => json!({ "error": self.to_string() }),
            ApiError::InvalidImage(e) => json!({
                "error": "Invalid image",
                "message": e.to_string()
            }),
            ApiError::TranslationFailed(details) => json!({
                "error": "Translation failed",
                "details": details
            }),
            ApiError::OcrFailed(message) => json!({
                "success": false,
                "error": message,
                "message": "OCR processing failed"
            }),
            ApiError::Internal(message) => json!({
                "success": false,
                "error": "Internal server error",
                "message": message
            }),
            ApiError::TooManyRequests { .. } | ApiError::InvalidBody | ApiError::BodyTooLarge => {
                json!({ "error": self.to_string() })
            }
        };

        let mut response = (status, Json(body)).into_response();
        if let ApiError::TooManyRequests { retry_after_secs } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }
        response
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn body_of(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn ocr_failure_envelope() {
        let response = ApiError::OcrFailed("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_of(response).await,
            json!({"success": false, "error": "boom", "message": "OCR processing failed"})
        );
    }

    #[tokio::test]
    async fn too_many_requests_sets_retry_after() {
        let response = ApiError::TooManyRequests { retry_after_secs: 42 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "42");
    }

    #[tokio::test]
    async fn validation_error_envelope() {
        let response = ApiError::from(ValidationError::InvalidFormat).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_of(response).await,
            json!({
                "error": "Invalid image",
                "message": "Invalid image format. Expected base64 encoded image."
            })
        );
    }
}
