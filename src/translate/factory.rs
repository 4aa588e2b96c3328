use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;
use tracing::info;

use crate::config::TranslateConfig;
use super::google::GoogleTranslateClient;
use super::interface::TranslateInterface;

/// Factory for creating translation gateways
pub struct TranslateFactory;

impl TranslateFactory {
    pub fn create_translator(translate_config: &TranslateConfig) -> Result<Arc<dyn TranslateInterface>> {
        info!("Initializing translation provider: {}", translate_config.translate_provider);

        match translate_config.translate_provider.as_str() {
            "google" => Ok(Arc::new(GoogleTranslateClient::new(
                translate_config.base_url.clone(),
                translate_config.timeout_secs.map(Duration::from_secs),
            )?)),
            _ => Err(anyhow::anyhow!(
                "Unsupported translation provider: {}",
                translate_config.translate_provider
            )),
        }
    }
}
