use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use super::interface::{TranslateInterface, TranslateResult};

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translation request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("translation provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected translation response: {0}")]
    UnexpectedShape(String),
}

/// Sentences returned by the `translate_a/single` endpoint
#[derive(Debug, PartialEq)]
pub struct GoogleTranslation {
    pub sentences: Vec<String>,
    pub detected_source: Option<String>,
}

impl GoogleTranslation {
    /// Parse the nested-array body: `[[[translated, original, ...], ...], _, source, ...]`
    pub fn from_value(body: &Value) -> Result<Self, TranslateError> {
        let segments = body
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| TranslateError::UnexpectedShape("missing sentence list".to_string()))?;

        let sentences = segments
            .iter()
            .filter_map(|segment| segment.get(0))
            .filter(|part| !part.is_null())
            .map(|part| {
                part.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| TranslateError::UnexpectedShape(format!("sentence is not text: {}", part)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if sentences.is_empty() {
            return Err(TranslateError::UnexpectedShape("no translated sentences".to_string()));
        }

        let detected_source = body.get(2).and_then(Value::as_str).map(str::to_string);
        Ok(Self {
            sentences,
            detected_source,
        })
    }

    pub fn text(&self) -> String {
        self.sentences.concat()
    }
}

/// Client for the public Google Translate `gtx` endpoint
pub struct GoogleTranslateClient {
    client: Client,
    base_url: String,
}

impl GoogleTranslateClient {
    pub fn new(base_url: String, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::ClientBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch(&self, text: &str, from: &str, to: &str) -> Result<GoogleTranslation, TranslateError> {
        let url = format!("{}/translate_a/single", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("client", "gtx"), ("sl", from), ("tl", to), ("dt", "t"), ("q", text)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        GoogleTranslation::from_value(&body)
    }
}

#[async_trait]
impl TranslateInterface for GoogleTranslateClient {
    async fn translate(&self, text: &str, from: &str, to: &str) -> Result<TranslateResult, anyhow::Error> {
        debug!("Translating {} chars from {} to {}", text.chars().count(), from, to);

        let translation = self.fetch(text, from, to).await.map_err(|e| {
            error!("Translation error: {}", e);
            e
        })?;

        if let Some(source) = &translation.detected_source {
            debug!("Provider detected source language {}", source);
        }
        Ok(TranslateResult {
            translated_text: translation.text(),
            to: to.to_string(),
        })
    }
}
