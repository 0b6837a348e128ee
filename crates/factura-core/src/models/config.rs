//! Configuration structures for the OCR client and output.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FacturaError, Result};

/// Main configuration for factura.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FacturaConfig {
    /// OCR service configuration.
    pub ocr: OcrServiceConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// OCR service (Azure Computer Vision Read API) configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrServiceConfig {
    /// Resource endpoint, e.g. `https://myres.cognitiveservices.azure.com`.
    pub endpoint: String,

    /// Subscription key sent as `Ocp-Apim-Subscription-Key`.
    pub api_key: String,

    /// Path of the analyze call, relative to the endpoint.
    pub read_path: String,

    /// Timeout for each HTTP request, in seconds.
    pub request_timeout_secs: u64,

    /// Status polling schedule.
    pub poll: PollConfig,
}

impl Default for OcrServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            read_path: "vision/v3.2/read/analyze".to_string(),
            request_timeout_secs: 30,
            poll: PollConfig::default(),
        }
    }
}

impl fmt::Debug for OcrServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OcrServiceConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &redact(&self.api_key))
            .field("read_path", &self.read_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("poll", &self.poll)
            .finish()
    }
}

/// Mask a secret for display.
pub fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "" } else { "********" }
}

impl OcrServiceConfig {
    /// Check that credentials are present and the endpoint is usable.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(FacturaError::Config("OCR endpoint is not configured".to_string()));
        }
        if self.api_key.trim().is_empty() {
            return Err(FacturaError::Config("OCR API key is not configured".to_string()));
        }
        if !self.endpoint.starts_with("https://") && !self.endpoint.starts_with("http://") {
            return Err(FacturaError::Config(format!(
                "OCR endpoint must be an http(s) URL: {}",
                self.endpoint
            )));
        }
        if self.poll.max_attempts == 0 {
            return Err(FacturaError::Config("poll.max_attempts must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Full URL of the analyze call.
    pub fn analyze_url(&self) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim().trim_end_matches('/'),
            self.read_path.trim_start_matches('/')
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Polling schedule for a running analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Maximum number of status requests before giving up.
    pub max_attempts: u32,

    /// Wait before the first status request, in milliseconds.
    pub initial_delay_ms: u64,

    /// Multiplier applied to the wait after each attempt.
    pub backoff_factor: u32,

    /// Upper bound for a single wait, in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            initial_delay_ms: 1000,
            backoff_factor: 2,
            max_delay_ms: 8000,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Number of items shown in the text summary (0 = all).
    pub display_items: usize,

    /// Write JSON with the legacy Spanish keys.
    pub legacy_keys: bool,

    /// Pretty-print JSON output.
    pub pretty: bool,

    /// Currency marker shown before amounts in the text summary.
    pub currency: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            display_items: 5,
            legacy_keys: false,
            pretty: true,
            currency: "S/".to_string(),
        }
    }
}

impl FacturaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> OcrServiceConfig {
        OcrServiceConfig {
            endpoint: "https://example.cognitiveservices.azure.com/".to_string(),
            api_key: "secret-key".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = FacturaConfig::default();
        assert_eq!(config.ocr.poll.max_attempts, 30);
        assert_eq!(config.output.display_items, 5);
        assert!(config.ocr.endpoint.is_empty());
    }

    #[test]
    fn test_missing_credentials() {
        let err = OcrServiceConfig::default().validate().unwrap_err();
        assert!(matches!(err, FacturaError::Config(_)));

        let mut config = configured();
        config.api_key.clear();
        assert!(matches!(config.validate(), Err(FacturaError::Config(_))));
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let mut config = configured();
        config.endpoint = "example.com".to_string();
        assert!(config.validate().is_err());
        assert!(configured().validate().is_ok());
    }

    #[test]
    fn test_analyze_url() {
        assert_eq!(
            configured().analyze_url(),
            "https://example.cognitiveservices.azure.com/vision/v3.2/read/analyze"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", configured());
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("********"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: FacturaConfig =
            serde_json::from_str(r#"{"ocr": {"endpoint": "https://x"}}"#).unwrap();
        assert_eq!(config.ocr.endpoint, "https://x");
        assert_eq!(config.ocr.read_path, "vision/v3.2/read/analyze");
        assert!(config.output.pretty);
    }
}
