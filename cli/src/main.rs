use clap::Parser;
use linkedin_scraper::linkedin::{self, Identity};
use linkedin_scraper::session::SessionConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Job-search results page to scrape
    url: String,

    /// WebDriver endpoint driving the browser
    #[clap(long, default_value = "http://localhost:4444")]
    webdriver_url: String,

    /// File the scraped jobs are written to
    #[clap(long, default_value = "company_jobs.json")]
    out: PathBuf,

    /// Fetch the page once over plain HTTP instead of driving a browser
    #[clap(long)]
    fetch_only: bool,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Cli::parse();

    let results = if args.fetch_only {
        linkedin::fetch_page(&args.url, &Identity::default()).await
    } else {
        linkedin::scrape(&args.webdriver_url, &args.url, SessionConfig::default()).await
    };
    let results = match results {
        Ok(results) => results,
        Err(e) => {
            log::error!("Scrape failed: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(total) = results.total {
        log::info!("Site reports {} total results", total);
    }
    let json = serde_json::to_string_pretty(&results.jobs).expect("Failed to serialize jobs");
    tokio::fs::write(&args.out, json)
        .await
        .expect("Failed to write output file");
    log::info!("Wrote {} jobs to {}", results.jobs.len(), args.out.display());
}
