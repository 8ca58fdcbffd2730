use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Settings for the HTTP side of scraping
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScrapeConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User agent sent when the extractor fetches the page itself
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// User agent sent by the independent fetch of the last strategy
    #[serde(default = "default_manual_user_agent")]
    pub manual_user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            manual_user_agent: default_manual_user_agent(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_manual_user_agent() -> String {
    concat!("scrape-recipe/", env!("CARGO_PKG_VERSION")).to_string()
}

impl ScrapeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with SCRAPE_RECIPE__ prefix
    /// 2. scrape_recipe.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: SCRAPE_RECIPE__TIMEOUT
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("scrape_recipe").required(false))
            .add_source(
                Environment::with_prefix("SCRAPE_RECIPE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
