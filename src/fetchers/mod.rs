use crate::error::ScrapeError;

mod request;

pub use request::RequestFetcher;

/// Anything that can turn a URL into page text.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}
