//! Configuration loading and validation

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Placement API settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// ISO currency code shown next to amounts
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Page sizes offered in the interactive review
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<usize>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            page_size: default_page_size(),
            page_size_options: default_page_size_options(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Quiet period before a search term is applied
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    /// Delay between placing/ignoring a slip and its removal
    #[serde(default = "default_removal_delay_ms")]
    pub removal_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: default_search_debounce_ms(),
            removal_delay_ms: default_removal_delay_ms(),
        }
    }
}

impl SessionConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn removal_delay(&self) -> Duration {
        Duration::from_millis(self.removal_delay_ms)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of human-readable ones
    #[serde(default)]
    pub json: bool,
}

// Default value functions
fn default_api_base_url() -> String {
    std::env::var("SLIP_API_URL").unwrap_or_else(|_| "https://public-slip-api-1.onrender.com".into())
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_currency() -> String {
    "EUR".into()
}

fn default_page_size() -> usize {
    crate::view::DEFAULT_PAGE_SIZE
}

fn default_page_size_options() -> Vec<usize> {
    vec![5, 10, 25, 50]
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_removal_delay_ms() -> u64 {
    400
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let settings = config::Config::builder()
            // Start with defaults
            .set_default("api.base_url", default_api_base_url())?
            .set_default("api.timeout_ms", default_timeout_ms() as i64)?
            .set_default("display.currency", default_currency())?
            .set_default("display.page_size", default_page_size() as i64)?
            // Load from file if exists
            .add_source(config::File::from(path).required(false))
            // Override with environment variables (prefix SLIPDESK_)
            .add_source(
                config::Environment::with_prefix("SLIPDESK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: Config = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            anyhow::bail!("api.base_url must not be empty");
        }
        url::Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid api.base_url: {}", self.api.base_url))?;

        if self.api.timeout_ms == 0 {
            anyhow::bail!("api.timeout_ms must be positive");
        }

        let currency = &self.display.currency;
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            anyhow::bail!("display.currency must be a 3-letter code, got {:?}", currency);
        }

        if self.display.page_size == 0 {
            anyhow::bail!("display.page_size must be positive");
        }

        if self.display.page_size_options.iter().any(|&n| n == 0) {
            anyhow::bail!("display.page_size_options must not contain 0");
        }

        if self.session.removal_delay_ms > 10_000 {
            tracing::warn!(
                "session.removal_delay_ms is {}ms - slips will linger a long time after placement",
                self.session.removal_delay_ms
            );
        }

        Ok(())
    }

    /// Get masked configuration for display (hide secrets)
    pub fn masked_display(&self) -> String {
        format!(
            r#"Configuration:
  API:
    base_url: {}
    timeout: {}ms
  Display:
    currency: {}
    page_size: {}
    page_size_options: {:?}
  Session:
    search_debounce: {}ms
    removal_delay: {}ms
  Logging:
    json: {}
"#,
            mask_url(&self.api.base_url),
            self.api.timeout_ms,
            self.display.currency,
            self.display.page_size,
            self.display.page_size_options,
            self.session.search_debounce_ms,
            self.session.removal_delay_ms,
            self.logging.json,
        )
    }
}

/// Mask URL for display (hide API keys in query params)
fn mask_url(url: &str) -> String {
    if let Some(idx) = url.find('?') {
        format!("{}?***", &url[..idx])
    } else {
        url.to_string()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            display: DisplayConfig::default(),
            session: SessionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
