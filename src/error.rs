use thiserror::Error;

/// Errors that can occur while scraping a recipe
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// No URL was given on the command line
    #[error("Usage: {0} <url>")]
    Usage(String),

    /// The URL could not be parsed or has no host
    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),

    /// No site scraper is registered for this host
    #[error("Website ({0}) is not supported by any site scraper")]
    NotSupported(String),

    /// The page carries no schema.org/Recipe markup
    #[error("No schema.org/Recipe structured data found")]
    NoStructuredData,

    /// Failed to fetch the page (connection error or non-2xx status)
    #[error("Failed to fetch URL: {0}")]
    Network(#[from] reqwest::Error),

    /// A single recipe field could not be read from an otherwise usable page
    #[error("Failed to extract {field}: {message}")]
    FieldExtraction { field: &'static str, message: String },

    /// Every strategy was tried and none produced a usable scraper
    #[error("Unable to scrape recipe from '{url}'")]
    TotalFailure {
        url: String,
        #[source]
        source: Box<ScrapeError>,
    },

    /// Failed to render the recipe as JSON
    #[error("Failed to serialize recipe: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ScrapeError {
    pub(crate) fn field(field: &'static str, message: impl Into<String>) -> Self {
        ScrapeError::FieldExtraction {
            field,
            message: message.into(),
        }
    }
}
