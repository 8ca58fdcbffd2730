use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use crate::extractors::{RecipeScraper, RecipeScrapers, ScrapeMode, ScraperFactory};
use crate::fetchers::{Fetcher, RequestFetcher};
use crate::model::{split_instructions, RecipeRecord};
use log::{debug, info};

/// One way of obtaining a recipe scraper, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Site-specific rules, the factory fetches the page
    SiteSpecific,
    /// schema.org data only, the factory fetches the page
    SchemaOrg,
    /// Independent fetch, then normal detection on the fetched content
    ManualFetch,
}

impl Strategy {
    pub const ORDER: [Strategy; 3] = [
        Strategy::SiteSpecific,
        Strategy::SchemaOrg,
        Strategy::ManualFetch,
    ];

    /// Progress notice shown when this strategy wins.
    pub fn notice(self) -> &'static str {
        match self {
            Strategy::SiteSpecific => "Using supported site scraper",
            Strategy::SchemaOrg => "Using schema.org fallback scraper",
            Strategy::ManualFetch => "Using manual HTML fetch",
        }
    }
}

/// Result of a single strategy.
pub enum AttemptOutcome {
    Success(Box<dyn RecipeScraper>),
    NotSupported(String),
    NoData,
    NetworkFailure(ScrapeError),
    Failed(ScrapeError),
}

impl From<Result<Box<dyn RecipeScraper>, ScrapeError>> for AttemptOutcome {
    fn from(result: Result<Box<dyn RecipeScraper>, ScrapeError>) -> Self {
        match result {
            Ok(scraper) => AttemptOutcome::Success(scraper),
            Err(ScrapeError::NotSupported(host)) => AttemptOutcome::NotSupported(host),
            Err(ScrapeError::NoStructuredData) => AttemptOutcome::NoData,
            Err(e @ ScrapeError::Network(_)) => AttemptOutcome::NetworkFailure(e),
            Err(e) => AttemptOutcome::Failed(e),
        }
    }
}

impl AttemptOutcome {
    pub fn status(&self) -> AttemptStatus {
        match self {
            AttemptOutcome::Success(_) => AttemptStatus::Success,
            AttemptOutcome::NotSupported(_) => AttemptStatus::NotSupported,
            AttemptOutcome::NoData => AttemptStatus::NoData,
            AttemptOutcome::NetworkFailure(e) => AttemptStatus::NetworkFailure(e.to_string()),
            AttemptOutcome::Failed(e) => AttemptStatus::Failed(e.to_string()),
        }
    }

    fn into_error(self) -> Option<ScrapeError> {
        match self {
            AttemptOutcome::Success(_) => None,
            AttemptOutcome::NotSupported(host) => Some(ScrapeError::NotSupported(host)),
            AttemptOutcome::NoData => Some(ScrapeError::NoStructuredData),
            AttemptOutcome::NetworkFailure(e) | AttemptOutcome::Failed(e) => Some(e),
        }
    }
}

/// What happened to a strategy, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptStatus {
    Success,
    NotSupported,
    NoData,
    NetworkFailure(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub strategy: Strategy,
    pub status: AttemptStatus,
}

/// A scraper obtained by one of the strategies.
pub struct Found {
    pub strategy: Strategy,
    pub scraper: Box<dyn RecipeScraper>,
    pub attempts: Vec<Attempt>,
}

/// A finished recipe together with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub record: RecipeRecord,
    pub strategy: Strategy,
    pub attempts: Vec<Attempt>,
}

/// Tries the strategies in order and stops at the first one that works.
pub struct Resolver<S: ScraperFactory, F: Fetcher> {
    factory: S,
    fetcher: F,
}

impl Resolver<RecipeScrapers<RequestFetcher>, RequestFetcher> {
    pub fn from_config(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        let factory = RecipeScrapers::new(config)?;
        let fetcher = RequestFetcher::new(config.timeout(), &config.manual_user_agent)?;
        Ok(Self::new(factory, fetcher))
    }
}

impl<S: ScraperFactory, F: Fetcher> Resolver<S, F> {
    pub fn new(factory: S, fetcher: F) -> Self {
        Self { factory, fetcher }
    }

    /// Find a scraper and read the whole record from it.
    pub fn resolve(&self, url: &str) -> Result<Resolved, ScrapeError> {
        let found = self.find_scraper(url)?;
        let record = read_record(found.scraper.as_ref())?;
        Ok(Resolved {
            record,
            strategy: found.strategy,
            attempts: found.attempts,
        })
    }

    /// Run the strategies in order. Only the last strategy's failure is returned.
    pub fn find_scraper(&self, url: &str) -> Result<Found, ScrapeError> {
        if url.trim().is_empty() {
            return Err(ScrapeError::InvalidUrl(url.to_string()));
        }

        let mut attempts = Vec::with_capacity(Strategy::ORDER.len());
        let mut last_error = None;

        for strategy in Strategy::ORDER {
            let outcome = self.attempt(strategy, url);
            attempts.push(Attempt {
                strategy,
                status: outcome.status(),
            });

            match outcome {
                AttemptOutcome::Success(scraper) => {
                    info!("Resolved {} with {:?}", url, strategy);
                    return Ok(Found {
                        strategy,
                        scraper,
                        attempts,
                    });
                }
                failure => {
                    debug!("{:?} failed for {}: {:?}", strategy, url, failure.status());
                    last_error = failure.into_error();
                }
            }
        }

        Err(ScrapeError::TotalFailure {
            url: url.to_string(),
            source: Box::new(last_error.unwrap_or(ScrapeError::NoStructuredData)),
        })
    }

    fn attempt(&self, strategy: Strategy, url: &str) -> AttemptOutcome {
        let result = match strategy {
            Strategy::SiteSpecific => self.factory.open(url, ScrapeMode::AutoDetect, None),
            Strategy::SchemaOrg => self.factory.open(url, ScrapeMode::SchemaOnly, None),
            Strategy::ManualFetch => self
                .fetcher
                .fetch(url)
                .and_then(|html| self.factory.open(url, ScrapeMode::AutoDetect, Some(html))),
        };
        AttemptOutcome::from(result)
    }
}

/// Read all nine fields; the first failing getter fails the whole record.
pub fn read_record(scraper: &dyn RecipeScraper) -> Result<RecipeRecord, ScrapeError> {
    Ok(RecipeRecord {
        title: scraper.title()?,
        total_time_minutes: scraper.total_time()?,
        yields: scraper.yields()?,
        ingredients: scraper.ingredients()?,
        instructions: split_instructions(&scraper.instructions()?),
        image_url: scraper.image()?,
        nutrients: scraper.nutrients()?,
        canonical_url: scraper.canonical_url()?,
        host: scraper.host()?,
    })
}
