use std::sync::OnceLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::HeaderValue;
use reqwest::multipart::Form;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use super::confidence::{estimate_confidence, PARSE_SUCCESS};
use super::interface::{OcrInterface, OcrResult};

/// Raw OCR.space response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OcrSpaceResponse {
    #[serde(default)]
    pub parsed_results: Option<Vec<ParsedResult>>,
    #[serde(rename = "OCRExitCode", default)]
    pub ocr_exit_code: Option<i32>,
    #[serde(default)]
    pub is_errored_on_processing: bool,
    #[serde(default)]
    pub error_message: Option<ErrorMessage>,
    #[serde(default)]
    pub error_details: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParsedResult {
    #[serde(default)]
    pub file_parse_exit_code: i32,
    #[serde(default)]
    pub parsed_text: String,
    #[serde(default)]
    pub error_message: Option<ErrorMessage>,
    #[serde(default)]
    pub error_details: Option<String>,
}

/// OCR.space sends error messages either as a string or a list of strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl ErrorMessage {
    /// The message text, or `None` when it is blank
    fn text(&self) -> Option<String> {
        let joined = match self {
            ErrorMessage::One(s) => s.trim().to_string(),
            ErrorMessage::Many(parts) => parts
                .iter()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        };
        (!joined.is_empty()).then_some(joined)
    }
}

/// What a decoded OCR.space response means
#[derive(Debug, Clone, PartialEq)]
pub enum OcrSpaceOutcome {
    ProcessingError(String),
    Parsed { text: String, confidence: u8 },
    ParseFailed(String),
    NoResults,
}

impl OcrSpaceResponse {
    pub fn classify(self) -> OcrSpaceOutcome {
        if self.is_errored_on_processing {
            debug!(
                "OCR.space processing error: exit code {:?}, details {:?}",
                self.ocr_exit_code, self.error_details
            );
            let message = self
                .error_message
                .as_ref()
                .and_then(ErrorMessage::text)
                .unwrap_or_else(|| "OCR processing error".to_string());
            return OcrSpaceOutcome::ProcessingError(message);
        }

        let Some(result) = self.parsed_results.and_then(|r| r.into_iter().next()) else {
            return OcrSpaceOutcome::NoResults;
        };

        if result.file_parse_exit_code == PARSE_SUCCESS {
            let confidence = estimate_confidence(result.file_parse_exit_code, &result.parsed_text);
            OcrSpaceOutcome::Parsed {
                text: result.parsed_text,
                confidence,
            }
        } else {
            debug!(
                "OCR.space parse failed with exit code {}: {:?}",
                result.file_parse_exit_code, result.error_details
            );
            let message = result
                .error_message
                .as_ref()
                .and_then(ErrorMessage::text)
                .unwrap_or_else(|| "Failed to parse image".to_string());
            OcrSpaceOutcome::ParseFailed(message)
        }
    }
}

impl OcrSpaceOutcome {
    pub fn into_result(self, processing_time: u64) -> OcrResult {
        match self {
            OcrSpaceOutcome::Parsed { text, confidence } => {
                OcrResult::recognized(text, confidence, processing_time)
            }
            OcrSpaceOutcome::ProcessingError(message) | OcrSpaceOutcome::ParseFailed(message) => {
                OcrResult::failed(message, processing_time)
            }
            OcrSpaceOutcome::NoResults => OcrResult::failed("No results from OCR", processing_time),
        }
    }
}

/// Failures of the HTTP exchange itself
#[derive(Debug, Error)]
pub enum OcrCallError {
    #[error("OCR API Error: {status} - {reason}")]
    Status { status: u16, reason: String },
    #[error("No response from OCR service")]
    NoResponse,
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for OcrCallError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            OcrCallError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            }
        } else if e.is_connect() || e.is_timeout() || e.is_request() {
            OcrCallError::NoResponse
        } else {
            let message = e.to_string();
            if message.is_empty() {
                OcrCallError::Other("Unknown OCR error".to_string())
            } else {
                OcrCallError::Other(message)
            }
        }
    }
}

fn data_url_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^data:image/\w+;base64,").expect("valid data url prefix"))
}

/// Strip any image data-URL prefix and declare the payload as JPEG.
///
/// The upstream always receives `image/jpeg`, whatever type the caller sent.
pub fn as_jpeg_data_url(image_data: &str) -> String {
    let payload = data_url_prefix().replace(image_data, "");
    format!("data:image/jpeg;base64,{}", payload)
}

/// Client for the OCR.space parse endpoint
pub struct OcrSpaceClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl OcrSpaceClient {
    pub fn new(api_url: String, api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::ClientBuilder::new().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }

    fn build_form(image_data: &str) -> Form {
        Form::new()
            .text("base64Image", as_jpeg_data_url(image_data))
            .text("language", "auto")
            .text("isOverlayRequired", "false")
            .text("detectOrientation", "true")
            .text("scale", "true")
            .text("OCREngine", "2")
    }

    async fn call(&self, image_data: &str) -> Result<OcrSpaceResponse, OcrCallError> {
        let api_key = HeaderValue::from_str(&self.api_key)
            .map_err(|e| OcrCallError::Other(format!("Invalid OCR API key: {}", e)))?;
        let response = self
            .client
            .post(&self.api_url)
            .header("apikey", api_key)
            .multipart(Self::build_form(image_data))
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!("Unrecognized OCR.space response ({}): {:.200}", e, body);
            OcrCallError::Other(format!("Unexpected OCR response: {}", e))
        })
    }
}

#[async_trait]
impl OcrInterface for OcrSpaceClient {
    async fn recognize(&self, image_data: &str) -> Result<OcrResult, anyhow::Error> {
        let start = Instant::now();

        debug!("Sending OCR request to {}", self.api_url);
        let result = match self.call(image_data).await {
            Ok(response) => response.classify().into_result(elapsed_ms(start)),
            Err(e) => {
                error!("OCR Service Error: {}", e);
                OcrResult::failed(e.to_string(), elapsed_ms(start))
            }
        };

        if let Some(error) = &result.error {
            debug!("OCR failed after {}ms: {}", result.processing_time, error);
        } else {
            debug!("OCR succeeded in {}ms", result.processing_time);
        }
        Ok(result)
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
