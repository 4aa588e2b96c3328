use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use anyhow::Result;
use regex::Regex;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,
    #[serde(default)]
    pub ocr_config: OcrConfig,
    #[serde(default)]
    pub translate_config: TranslateConfig,
    #[serde(default)]
    pub upload_config: UploadConfig,
    #[serde(default)]
    pub rate_limit_config: RateLimitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum accepted JSON body, in megabytes
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_body_limit_mb() -> usize {
    50
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_ocr_provider")]
    pub ocr_provider: String,
    #[serde(default = "default_ocr_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_ocr_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_ocr_provider() -> String {
    "ocr_space".to_string()
}

fn default_ocr_api_url() -> String {
    "https://api.ocr.space/parse/image".to_string()
}

fn default_ocr_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    #[serde(default = "default_translate_provider")]
    pub translate_provider: String,
    #[serde(default = "default_translate_base_url")]
    pub base_url: String,
    /// No timeout unless set
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_translate_provider() -> String {
    "google".to_string()
}

fn default_translate_base_url() -> String {
    "https://translate.googleapis.com".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_image_mb")]
    pub max_image_mb: usize,
}

fn default_max_image_mb() -> usize {
    crate::validation::DEFAULT_MAX_IMAGE_MB
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
}

fn default_window_secs() -> u64 {
    15 * 60
}

fn default_max_requests() -> u32 {
    100
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_mb: default_body_limit_mb(),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            ocr_provider: default_ocr_provider(),
            api_url: default_ocr_api_url(),
            api_key: String::new(),
            timeout_secs: default_ocr_timeout_secs(),
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            translate_provider: default_translate_provider(),
            base_url: default_translate_base_url(),
            timeout_secs: None,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_image_mb: default_max_image_mb(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            max_requests: default_max_requests(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML or JSON file, substituting `${VAR}`
    /// placeholders from the environment first
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!("Configuration file not found: {}", path);
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&substitute_env(&content), path)
    }

    fn parse(content: &str, path: &str) -> Result<Self> {
        let path_lower = path.to_lowercase();
        let config = if path_lower.ends_with(".json") {
            serde_json::from_str(content)?
        } else {
            serde_yaml::from_str(content)?
        };
        Ok(config)
    }

    /// Apply the environment variables that take precedence over the file
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("OCR_SPACE_API_KEY") {
            if !key.is_empty() {
                self.ocr_config.api_key = key;
            }
        }
        self.clear_unresolved_placeholders();
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.system_config.port = port;
        }
    }

    /// A placeholder that survived substitution means the key was never provided
    fn clear_unresolved_placeholders(&mut self) {
        if self.ocr_config.api_key.starts_with("${") {
            self.ocr_config.api_key.clear();
        }
    }
}

/// Replace `${VAR_NAME}` with the variable's value; unknown variables are left as is
pub fn substitute_env(content: &str) -> String {
    substitute_with(content, |name| std::env::var(name).ok())
}

fn substitute_with(content: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let pattern = Regex::new(r"\$\{(\w+)\}").expect("valid env placeholder pattern");
    pattern
        .replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| {
                debug!("Environment variable {} not set, keeping placeholder", var_name);
                caps[0].to_string()
            })
        })
        .into_owned()
}
