use std::sync::Arc;

use crate::config::Config;
use crate::ocr::{OcrFactory, OcrInterface};
use crate::rate_limit::RateLimiter;
use crate::translate::{TranslateFactory, TranslateInterface};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub ocr: Arc<dyn OcrInterface>,
    pub translator: Arc<dyn TranslateInterface>,
    pub translate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let ocr = OcrFactory::create_ocr(&config.ocr_config)?;
        let translator = TranslateFactory::create_translator(&config.translate_config)?;
        Ok(Self::with_gateways(config, ocr, translator))
    }

    /// Build state around already constructed gateways
    pub fn with_gateways(
        config: Config,
        ocr: Arc<dyn OcrInterface>,
        translator: Arc<dyn TranslateInterface>,
    ) -> Self {
        let translate_limiter = Arc::new(RateLimiter::from_config(&config.rate_limit_config));
        Self {
            config,
            ocr,
            translator,
            translate_limiter,
        }
    }
}
