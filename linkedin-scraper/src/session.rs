use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thirtyfour::prelude::*;
use thiserror::Error;
use tokio::time::{sleep, Instant};

const SCROLL_HEIGHT: &str = "return document.body.scrollHeight";
const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to load '{0}'")]
    Navigation(String),
    #[error("Browser session error: '{0}'")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),
    #[error("Unexpected script result for '{0}'")]
    Script(&'static str),
    #[error("Page height still changing after {0} scroll cycles")]
    NeverSettled(u32),
    #[error("Session method '{0}' called out of order")]
    OutOfOrder(&'static str),
}

/// The capability set a rendering-session host has to provide. Any
/// headless-browser-capable backend works; tests use a scripted fake.
#[async_trait]
pub trait Browser: Send {
    async fn navigate(&mut self, url: &str) -> Result<()>;
    async fn execute(&mut self, script: &str) -> Result<Value>;
    async fn page_source(&mut self) -> Result<String>;
    async fn terminate(self) -> Result<()>;
}

#[async_trait]
impl Browser for WebDriver {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.goto(url)
            .await
            .map_err(|e| Error::Navigation(format!("{}: {}", url, e)))
    }

    async fn execute(&mut self, script: &str) -> Result<Value> {
        let ret = self.handle.execute(script, vec![]).await?;
        Ok(ret.json().clone())
    }

    async fn page_source(&mut self) -> Result<String> {
        Ok(self.source().await?)
    }

    async fn terminate(self) -> Result<()> {
        Ok(self.quit().await?)
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Settle delay after navigation, before any interaction.
    pub page_load_wait: Duration,
    /// Interval between height probes while waiting for content to load.
    pub settle_poll: Duration,
    /// Maximum wait per scroll cycle before the height is taken as final.
    pub settle_wait: Duration,
    /// Cap on scroll cycles, in case the page never stops growing.
    pub max_cycles: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            page_load_wait: Duration::from_secs(3),
            settle_poll: Duration::from_millis(500),
            settle_wait: Duration::from_secs(3),
            max_cycles: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Created,
    Opened,
    Exhausted,
}

/// Drives one browser session through `open` -> `exhaust_content` ->
/// `snapshot`. Closing consumes the session, so it cannot be closed twice
/// or used afterwards.
pub struct Session<B> {
    browser: B,
    config: SessionConfig,
    state: State,
}

impl<B: Browser> Session<B> {
    pub fn new(browser: B) -> Self {
        Self::with_config(browser, SessionConfig::default())
    }

    pub fn with_config(browser: B, config: SessionConfig) -> Self {
        Self {
            browser,
            config,
            state: State::Created,
        }
    }

    /// Navigates to `url` and waits for the initial render.
    pub async fn open(&mut self, url: &str) -> Result<()> {
        if self.state != State::Created {
            return Err(Error::OutOfOrder("open"));
        }
        self.browser.navigate(url).await?;
        sleep(self.config.page_load_wait).await;
        self.state = State::Opened;
        Ok(())
    }

    /// Scrolls to the bottom of the page until one full cycle produces no
    /// height change, i.e. no further results are loading. Returns the
    /// number of scroll cycles performed.
    pub async fn exhaust_content(&mut self) -> Result<u32> {
        if self.state != State::Opened {
            return Err(Error::OutOfOrder("exhaust_content"));
        }
        let mut last = self.extent().await?;
        for cycle in 1..=self.config.max_cycles {
            self.browser.execute(SCROLL_TO_BOTTOM).await?;
            let next = self.wait_for_growth(last).await?;
            if next == last {
                log::debug!("page height settled at {} after {} scroll cycles", next, cycle);
                self.state = State::Exhausted;
                return Ok(cycle);
            }
            last = next;
        }
        Err(Error::NeverSettled(self.config.max_cycles))
    }

    /// The fully rendered markup. Only meaningful once the page has
    /// stopped growing.
    pub async fn snapshot(&mut self) -> Result<String> {
        if self.state != State::Exhausted {
            return Err(Error::OutOfOrder("snapshot"));
        }
        self.browser.page_source().await
    }

    pub async fn close(self) -> Result<()> {
        self.browser.terminate().await
    }

    /// Runs the whole open/exhaust/snapshot sequence, shutting the browser
    /// down on every exit path. A shutdown failure after a successful
    /// render is logged rather than raised over the result.
    pub async fn collect(mut self, url: &str) -> Result<String> {
        let outcome = self.render(url).await;
        if let Err(e) = self.close().await {
            log::error!("Failed to shut down browser session: {}", e);
        }
        outcome
    }

    async fn render(&mut self, url: &str) -> Result<String> {
        self.open(url).await?;
        let cycles = self.exhaust_content().await?;
        log::info!("All results loaded after {} scroll cycles", cycles);
        self.snapshot().await
    }

    /// Polls the page height every `settle_poll` until it differs from
    /// `last` or `settle_wait` elapses, then returns the latest reading.
    async fn wait_for_growth(&mut self, last: u64) -> Result<u64> {
        let deadline = Instant::now() + self.config.settle_wait;
        loop {
            sleep(self.config.settle_poll).await;
            let extent = self.extent().await?;
            if extent != last || Instant::now() >= deadline {
                return Ok(extent);
            }
        }
    }

    async fn extent(&mut self) -> Result<u64> {
        let value = self.browser.execute(SCROLL_HEIGHT).await?;
        value.as_u64().ok_or(Error::Script(SCROLL_HEIGHT))
    }
}
