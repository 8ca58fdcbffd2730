use super::schema::{normalize_yields, SchemaRecipe};
use super::sites::{SiteRegistry, SiteRules};
use super::{find_schema, RecipeScraper, ScrapeMode, ScraperFactory};
use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use crate::fetchers::{Fetcher, RequestFetcher};
use log::debug;
use reqwest::Url;
use scraper::{Html, Selector};
use std::collections::BTreeMap;

/// Host used for site lookup: lower-cased, without a leading `www.`.
pub fn normalize_host(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    Some(host.strip_prefix("www.").map(str::to_string).unwrap_or(host))
}

/// A fetched recipe page, read through site rules and/or schema.org data.
pub struct PageScraper {
    url: Url,
    host: String,
    rules: Option<SiteRules>,
    schema: Option<SchemaRecipe>,
    document: Html,
}

impl PageScraper {
    pub fn new(url: Url, host: String, rules: Option<SiteRules>, html: &str) -> Self {
        let document = Html::parse_document(html);
        let schema = find_schema(&document);
        debug!(
            "PageScraper: {} (site rules: {}, schema.org: {})",
            url,
            rules.as_ref().map_or("none", |r| r.name),
            schema.is_some()
        );

        Self {
            url,
            host,
            rules,
            schema,
            document,
        }
    }

    pub fn has_site_rules(&self) -> bool {
        self.rules.is_some()
    }

    pub fn has_schema(&self) -> bool {
        self.schema.is_some()
    }

    fn meta_content(&self, css: &str) -> Option<String> {
        let selector = Selector::parse(css).ok()?;
        self.document
            .select(&selector)
            .filter_map(|el| el.value().attr("content").or_else(|| el.value().attr("href")))
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(str::to_string)
    }

    fn absolute(&self, link: &str) -> String {
        self.url
            .join(link)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| link.to_string())
    }
}

impl RecipeScraper for PageScraper {
    fn title(&self) -> Result<String, ScrapeError> {
        self.rules
            .as_ref()
            .and_then(|rules| rules.select_text(&self.document, rules.title))
            .or_else(|| self.schema.as_ref().and_then(|s| s.name.clone()))
            .ok_or_else(|| ScrapeError::field("title", "no recipe title found on the page"))
    }

    fn total_time(&self) -> Result<Option<u32>, ScrapeError> {
        Ok(self.schema.as_ref().and_then(SchemaRecipe::total_minutes))
    }

    fn yields(&self) -> Result<Option<String>, ScrapeError> {
        let from_rules = self
            .rules
            .as_ref()
            .and_then(|rules| rules.select_text(&self.document, rules.yields))
            .and_then(|text| normalize_yields(&text));

        Ok(from_rules.or_else(|| self.schema.as_ref().and_then(|s| s.recipe_yield.clone())))
    }

    fn ingredients(&self) -> Result<Vec<String>, ScrapeError> {
        if let Some(rules) = &self.rules {
            let ingredients = rules.select_list(&self.document, rules.ingredients);
            if !ingredients.is_empty() {
                return Ok(ingredients);
            }
        }
        Ok(self
            .schema
            .as_ref()
            .map(|s| s.ingredients.clone())
            .unwrap_or_default())
    }

    fn instructions(&self) -> Result<String, ScrapeError> {
        if let Some(rules) = &self.rules {
            let steps = rules.select_list(&self.document, rules.instructions);
            if !steps.is_empty() {
                return Ok(steps.join("\n"));
            }
        }
        Ok(self
            .schema
            .as_ref()
            .map(|s| s.instructions.join("\n"))
            .unwrap_or_default())
    }

    fn image(&self) -> Result<Option<String>, ScrapeError> {
        let image = self
            .schema
            .as_ref()
            .and_then(|s| s.images.first().cloned())
            .or_else(|| self.meta_content("meta[property='og:image']"));

        Ok(image.map(|link| self.absolute(&link)))
    }

    fn nutrients(&self) -> Result<BTreeMap<String, String>, ScrapeError> {
        match &self.schema {
            Some(schema) => schema
                .nutrients()
                .map_err(|message| ScrapeError::field("nutrients", message)),
            None => Ok(BTreeMap::new()),
        }
    }

    fn canonical_url(&self) -> Result<String, ScrapeError> {
        let canonical = self
            .meta_content("link[rel='canonical']")
            .or_else(|| self.meta_content("meta[property='og:url']"));

        Ok(match canonical {
            Some(link) => self.absolute(&link),
            None => self.url.to_string(),
        })
    }

    fn host(&self) -> Result<String, ScrapeError> {
        Ok(self.host.clone())
    }
}

/// The extractor factory: site rules for known hosts, schema.org for the rest.
pub struct RecipeScrapers<F: Fetcher = RequestFetcher> {
    fetcher: F,
    registry: SiteRegistry,
}

impl RecipeScrapers<RequestFetcher> {
    pub fn new(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        let fetcher = RequestFetcher::new(config.timeout(), &config.user_agent)?;
        Ok(Self::with_fetcher(fetcher, SiteRegistry::default()))
    }
}

impl<F: Fetcher> RecipeScrapers<F> {
    pub fn with_fetcher(fetcher: F, registry: SiteRegistry) -> Self {
        Self { fetcher, registry }
    }
}

impl<F: Fetcher> ScraperFactory for RecipeScrapers<F> {
    fn open(
        &self,
        url: &str,
        mode: ScrapeMode,
        html: Option<String>,
    ) -> Result<Box<dyn RecipeScraper>, ScrapeError> {
        let parsed = Url::parse(url).map_err(|_| ScrapeError::InvalidUrl(url.to_string()))?;
        let host = normalize_host(&parsed).ok_or_else(|| ScrapeError::InvalidUrl(url.to_string()))?;

        let rules = match mode {
            ScrapeMode::AutoDetect => self.registry.get(&host).cloned(),
            ScrapeMode::SchemaOnly => None,
        };

        // without pre-fetched content, unknown hosts are rejected before any request
        if mode == ScrapeMode::AutoDetect && rules.is_none() && html.is_none() {
            return Err(ScrapeError::NotSupported(host));
        }

        let html = match html {
            Some(html) => html,
            None => self.fetcher.fetch(url)?,
        };

        let page = PageScraper::new(parsed, host, rules, &html);
        if !page.has_site_rules() && !page.has_schema() {
            return Err(ScrapeError::NoStructuredData);
        }

        Ok(Box::new(page))
    }
}
