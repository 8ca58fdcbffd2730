use log::debug;
use scrape_recipe::{read_record, Resolver, ScrapeConfig, ScrapeError};
use std::env;
use std::process::ExitCode;

const PLAUSIBLE_CAUSES: [&str; 4] = [
    "Unsupported website (not in the site scraper registry)",
    "No structured recipe data (schema.org/Recipe) found",
    "Network connectivity issues",
    "Website blocking automated requests",
];

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("scrape-recipe");
    let Some(url) = args.get(1).filter(|url| !url.trim().is_empty()) else {
        eprintln!("{}", ScrapeError::Usage(program.to_string()));
        return ExitCode::FAILURE;
    };

    eprintln!("Scraping recipe from: {url}\n");

    match run(url) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            report(url, &e);
            ExitCode::FAILURE
        }
    }
}

fn run(url: &str) -> Result<String, ScrapeError> {
    let config = ScrapeConfig::load()?;
    debug!("{:?}", config);

    let resolver = Resolver::from_config(&config)?;
    let found = resolver.find_scraper(url)?;
    eprintln!("✓ {}", found.strategy.notice());

    let record = read_record(found.scraper.as_ref())?;
    Ok(serde_json::to_string_pretty(&record)?)
}

fn report(url: &str, error: &ScrapeError) {
    match error {
        ScrapeError::TotalFailure { source, .. } => {
            eprintln!("Error: Unable to scrape recipe from '{url}'");
            eprintln!("Details: {source}");
            eprintln!("This could be due to:");
            for cause in PLAUSIBLE_CAUSES {
                eprintln!("  - {cause}");
            }
        }
        ScrapeError::FieldExtraction { .. } => {
            eprintln!("Error: Unable to extract recipe data from '{url}'");
            eprintln!("Details: {error}");
        }
        other => {
            eprintln!("Error: Unable to scrape recipe from '{url}'");
            eprintln!("Details: {other}");
        }
    }
}
