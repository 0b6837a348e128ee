//! CLI subcommands and the configuration plumbing they share.

pub mod batch;
pub mod config;
pub mod extract;
pub mod parse;

use std::path::{Path, PathBuf};

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use factura_core::models::config::{FacturaConfig, OcrServiceConfig};

/// OCR service overrides. Values given here win over the config file.
#[derive(Args, Clone, Debug, Default)]
pub struct ServiceArgs {
    /// OCR service endpoint
    #[arg(long, env = "FACTURA_OCR_ENDPOINT")]
    pub endpoint: Option<String>,

    /// OCR service subscription key
    #[arg(long, env = "FACTURA_OCR_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Maximum number of status polls before giving up
    #[arg(long)]
    pub max_attempts: Option<u32>,
}

impl ServiceArgs {
    pub fn apply(&self, config: &mut OcrServiceConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(api_key) = &self.api_key {
            config.api_key = api_key.clone();
        }
        if let Some(max_attempts) = self.max_attempts {
            config.poll.max_attempts = max_attempts;
        }
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("factura")
        .join("config.json")
}

/// Load the explicit config file, else the default one if present, else
/// built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FacturaConfig> {
    if let Some(path) = config_path {
        debug!("Loading configuration from {}", path);
        return Ok(FacturaConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading configuration from {}", default_path.display());
        Ok(FacturaConfig::from_file(&default_path)?)
    } else {
        Ok(FacturaConfig::default())
    }
}

pub fn spinner() -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    Ok(pb)
}
