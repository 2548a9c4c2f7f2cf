pub mod parser;
pub mod types;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use thirtyfour::prelude::*;
use thiserror::Error;

use crate::session::{Session, SessionConfig};
use types::SearchResults;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Request error: '{0}'")]
    Request(#[from] reqwest::Error),
    #[error("Failed to scrape data from: '{0}'")]
    RequestNotOk(String),
    #[error("Invalid identity header: '{0}'")]
    Identity(#[from] reqwest::header::InvalidHeaderValue),
    #[error("Browser session error: '{0}'")]
    Session(#[from] crate::session::Error),
}

/// Request identity sent on the direct-fetch path. The defaults announce a
/// plain Chrome desktop browser.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub accept_encoding: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/96.0.4664.110 Safari/537.36"
                .to_owned(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,\
                     image/apng,*/*;q=0.8"
                .to_owned(),
            accept_language: "en-US,en;q=0.9".to_owned(),
            accept_encoding: "gzip, deflate, br".to_owned(),
        }
    }
}

impl Identity {
    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_str(&self.accept)?);
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(&self.accept_language)?);
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_str(&self.accept_encoding)?);
        Ok(headers)
    }
}

/// Fetches a single search page over plain HTTP and parses it. No browser
/// involved, so only the first batch of results is visible.
pub async fn fetch_page(url: &str, identity: &Identity) -> Result<SearchResults> {
    let client = Client::builder().default_headers(identity.headers()?).build()?;
    log::info!("GET {}", url);
    let resp = client.get(url).send().await?;
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        log::error!("Request not successful, status code: {}, body: {}", status, body);
        return Err(Error::RequestNotOk(url.to_owned()));
    }
    let results = parser::parse_jobs(&body);
    log::info!("Scraped {} jobs from search results", results.jobs.len());
    Ok(results)
}

/// Drives a browser session against `target`, scrolling until all results
/// have loaded, then parses the final markup. `webdriver_url` points at a
/// running WebDriver endpoint, e.g. a local chromedriver.
pub async fn scrape(
    webdriver_url: &str,
    target: &str,
    config: SessionConfig,
) -> Result<SearchResults> {
    let mut caps = DesiredCapabilities::chrome();
    caps.add_chrome_arg("--start-maximized")
        .map_err(crate::session::Error::from)?;
    let driver = WebDriver::new(webdriver_url, caps)
        .await
        .map_err(crate::session::Error::from)?;
    let session = Session::with_config(driver, config);
    let html = session.collect(target).await?;
    let results = parser::parse_jobs(&html);
    log::info!("Scraped {} jobs from search results", results.jobs.len());
    Ok(results)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_identity_builds_headers() {
        let headers = Identity::default().headers().unwrap();
        assert_eq!(headers.len(), 4);
        assert!(headers
            .get(USER_AGENT)
            .unwrap()
            .to_str()
            .unwrap()
            .contains("Chrome"));
    }
}
