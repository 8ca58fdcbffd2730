use super::Fetcher;
use crate::error::ScrapeError;
use log::debug;
use reqwest::blocking::Client;
use std::time::Duration;

pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }
}

impl Fetcher for RequestFetcher {
    fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        debug!("RequestFetcher: GET {}", url);
        let response = self.client.get(url).send()?.error_for_status()?;
        let html = response.text()?;
        debug!("RequestFetcher: received {} bytes from {}", html.len(), url);
        Ok(html)
    }
}
