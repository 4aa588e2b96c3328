use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Language reported for every successful recognition; the provider's
/// detected language is not propagated
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Normalized OCR outcome, independent of the provider that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Milliseconds from call start to classification
    pub processing_time: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OcrResult {
    pub fn recognized(text: String, confidence: u8, processing_time: u64) -> Self {
        Self {
            success: true,
            text: Some(text),
            confidence: Some(confidence),
            language: Some(DEFAULT_LANGUAGE.to_string()),
            processing_time,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>, processing_time: u64) -> Self {
        Self {
            success: false,
            text: None,
            confidence: None,
            language: None,
            processing_time,
            error: Some(error.into()),
        }
    }
}

/// OCR interface trait
#[async_trait]
pub trait OcrInterface: Send + Sync {
    /// Recognize text in a data-URL encoded image.
    ///
    /// Upstream failures come back as `Ok` with `success == false`; `Err` is
    /// reserved for faults that never reached the provider.
    async fn recognize(&self, image_data: &str) -> Result<OcrResult, anyhow::Error>;
}
