use crate::error::ScrapeError;
use scraper::Html;
use std::collections::BTreeMap;

mod json_ld;
mod microdata;
mod page;
pub mod schema;
pub mod sites;

pub use page::{normalize_host, PageScraper, RecipeScrapers};
pub use schema::SchemaRecipe;
pub use sites::{SiteRegistry, SiteRules};

/// How the factory should read a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeMode {
    /// Site-specific rules when the host is known.
    AutoDetect,
    /// Skip site rules and read embedded schema.org data only.
    SchemaOnly,
}

/// A page that was recognized as a recipe. Every getter may fail on its own.
pub trait RecipeScraper {
    fn title(&self) -> Result<String, ScrapeError>;
    fn total_time(&self) -> Result<Option<u32>, ScrapeError>;
    fn yields(&self) -> Result<Option<String>, ScrapeError>;
    fn ingredients(&self) -> Result<Vec<String>, ScrapeError>;
    /// All steps in one string, separated by line breaks.
    fn instructions(&self) -> Result<String, ScrapeError>;
    fn image(&self) -> Result<Option<String>, ScrapeError>;
    fn nutrients(&self) -> Result<BTreeMap<String, String>, ScrapeError>;
    fn canonical_url(&self) -> Result<String, ScrapeError>;
    fn host(&self) -> Result<String, ScrapeError>;
}

pub trait ScraperFactory {
    /// Open `url` as a recipe page, fetching it unless `html` is given.
    fn open(
        &self,
        url: &str,
        mode: ScrapeMode,
        html: Option<String>,
    ) -> Result<Box<dyn RecipeScraper>, ScrapeError>;
}

/// Read a schema.org/Recipe from an HTML page, JSON-LD first, microdata second.
pub fn parse_schema(html: &str) -> Option<SchemaRecipe> {
    find_schema(&Html::parse_document(html))
}

pub(crate) fn find_schema(document: &Html) -> Option<SchemaRecipe> {
    json_ld::extract(document).or_else(|| microdata::extract(document))
}
