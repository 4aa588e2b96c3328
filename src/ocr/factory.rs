use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;
use tracing::{info, warn};

use crate::config::OcrConfig;
use super::interface::OcrInterface;
use super::ocr_space::OcrSpaceClient;

/// Factory for creating OCR gateways
pub struct OcrFactory;

impl OcrFactory {
    /// Create an OCR gateway based on configuration.
    ///
    /// A missing API key is only warned about; requests will then be
    /// rejected by the provider.
    pub fn create_ocr(ocr_config: &OcrConfig) -> Result<Arc<dyn OcrInterface>> {
        info!("Initializing OCR provider: {}", ocr_config.ocr_provider);

        match ocr_config.ocr_provider.as_str() {
            "ocr_space" => {
                if ocr_config.api_key.is_empty() {
                    warn!("OCR_SPACE_API_KEY not found in environment variables");
                }
                Ok(Arc::new(OcrSpaceClient::new(
                    ocr_config.api_url.clone(),
                    ocr_config.api_key.clone(),
                    Duration::from_secs(ocr_config.timeout_secs),
                )?))
            }
            _ => Err(anyhow::anyhow!("Unsupported OCR provider: {}", ocr_config.ocr_provider)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_does_not_block_creation() {
        assert!(OcrFactory::create_ocr(&OcrConfig::default()).is_ok());
    }

    #[test]
    fn rejects_unknown_provider() {
        let config = OcrConfig {
            ocr_provider: "tesseract".to_string(),
            ..OcrConfig::default()
        };
        let err = OcrFactory::create_ocr(&config).err().unwrap();
        assert!(err.to_string().contains("tesseract"));
    }
}
