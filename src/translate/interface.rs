use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of `POST /api/translate`; fields are optional so that a missing or
/// non-string one is reported by the handler instead of the extractor
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TranslateRequest {
    #[serde(default, deserialize_with = "string_or_none")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub from: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub to: Option<String>,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResult {
    pub translated_text: String,
    pub to: String,
}

/// Translation interface trait
#[async_trait]
pub trait TranslateInterface: Send + Sync {
    /// Translate `text` from one language code to another.
    ///
    /// Language codes are passed through to the provider unchecked.
    async fn translate(&self, text: &str, from: &str, to: &str) -> Result<TranslateResult, anyhow::Error>;
}
