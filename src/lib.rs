//! Scrape structured recipe data (title, ingredients, instructions, timing,
//! yield, nutrients, image, canonical URL, host) from a recipe web page.
//!
//! Three strategies are tried in order: site-specific rules, schema.org-only
//! parsing, and an independent fetch handed to normal detection. The first
//! one that yields a scraper wins.
//!
//! ```no_run
//! let resolved = scrape_recipe::scrape("https://www.allrecipes.com/recipe/10813/")?;
//! println!("{}", serde_json::to_string_pretty(&resolved.record)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod model;
pub mod resolver;

pub use config::ScrapeConfig;
pub use error::ScrapeError;
pub use extractors::{RecipeScraper, RecipeScrapers, ScrapeMode, ScraperFactory};
pub use fetchers::{Fetcher, RequestFetcher};
pub use model::RecipeRecord;
pub use resolver::{read_record, Attempt, AttemptStatus, Resolved, Resolver, Strategy};

/// Scrape `url` with configuration loaded from `scrape_recipe.toml` and the environment.
pub fn scrape(url: &str) -> Result<Resolved, ScrapeError> {
    let config = ScrapeConfig::load()?;
    scrape_with_config(url, &config)
}

pub fn scrape_with_config(url: &str, config: &ScrapeConfig) -> Result<Resolved, ScrapeError> {
    Resolver::from_config(config)?.resolve(url)
}
