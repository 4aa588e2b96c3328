use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::ocr::OcrResult;
use crate::state::AppState;
use crate::translate::{TranslateRequest, TranslateResult};
use crate::validation::{validate_image, ValidationError};

/// Body of `POST /api/upload`; `image` is read as any JSON value so that a
/// wrong type is reported as an invalid image
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ImageUploadRequest {
    #[serde(default)]
    pub image: Option<Value>,
}

impl ImageUploadRequest {
    fn image_data(self) -> Result<String, ValidationError> {
        match self.image {
            None | Some(Value::Null) => Ok(String::new()),
            Some(Value::String(image)) => Ok(image),
            Some(_) => Err(ValidationError::InvalidFormat),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub text: Option<String>,
    pub confidence: Option<u8>,
    pub language: Option<String>,
    pub processing_time: u64,
}

impl From<OcrResult> for UploadResponse {
    fn from(result: OcrResult) -> Self {
        Self {
            success: result.success,
            text: result.text,
            confidence: result.confidence,
            language: result.language,
            processing_time: result.processing_time,
        }
    }
}

fn required(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

pub async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> ApiResult<Json<TranslateResult>> {
    let Json(payload) = payload?;
    let (Some(text), Some(from), Some(to)) = (
        required(payload.text),
        required(payload.from),
        required(payload.to),
    ) else {
        return Err(ApiError::MissingTranslateFields);
    };

    let result = state
        .translator
        .translate(&text, &from, &to)
        .await
        .map_err(|e| ApiError::TranslationFailed(e.to_string()))?;

    Ok(Json(result))
}

pub async fn upload(
    State(state): State<AppState>,
    payload: Result<Json<ImageUploadRequest>, JsonRejection>,
) -> ApiResult<Json<UploadResponse>> {
    let Json(payload) = payload?;
    let request_id = Uuid::new_v4();
    let image = payload.image_data().map_err(|e| {
        warn!(%request_id, "Rejected upload: {}", e);
        ApiError::from(e)
    })?;
    process_upload(&state, &image)
        .instrument(info_span!("upload", %request_id))
        .await
        .map(Json)
}

async fn process_upload(state: &AppState, image: &str) -> ApiResult<UploadResponse> {
    if let Err(e) = validate_image(image, state.config.upload_config.max_image_mb) {
        warn!("Rejected upload: {}", e);
        return Err(ApiError::from(e));
    }

    let result = state
        .ocr
        .recognize(image)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    if !result.success {
        let error = result.error.unwrap_or_else(|| "Unknown OCR error".to_string());
        warn!("OCR failed in {}ms: {}", result.processing_time, error);
        return Err(ApiError::OcrFailed(error));
    }

    info!("OCR completed in {}ms", result.processing_time);
    Ok(UploadResponse::from(result))
}
