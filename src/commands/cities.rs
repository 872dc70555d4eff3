//! City enumeration and the `cities` command.

use crate::browser::{Browser, BrowserError, WebDriverBrowser};
use crate::config::Config;
use crate::format::Formatter;
use crate::ihg::selectors::landing;
use crate::ihg::{CityRef, PageParser};
use crate::store::CityList;
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{info, warn};

/// Collects city listing links from the explore page.
pub struct CityEnumerator {
    start_url: String,
    timeout: Duration,
}

impl CityEnumerator {
    pub fn new(config: &Config) -> Self {
        Self { start_url: config.start_url.clone(), timeout: config.timeout() }
    }

    /// Returns the city links in page order. A page without links yields an
    /// empty list.
    pub async fn enumerate<B>(&self, browser: &B) -> Result<Vec<CityRef>, BrowserError>
    where
        B: Browser + ?Sized,
    {
        info!("Enumerating cities from {}", self.start_url);
        browser.goto(&self.start_url).await?;

        if !browser.wait_for(landing::CITY_LINK_CSS, self.timeout).await? {
            warn!("No city links on {} after {:?}", self.start_url, self.timeout);
            return Ok(Vec::new());
        }

        let html = browser.page_source().await?;
        let cities = PageParser::new(&html, &self.start_url).city_links();
        info!("Found {} cities", cities.len());
        Ok(cities)
    }
}

/// Returns the saved city list, enumerating and saving it when there is none
/// (or when `refresh` is set).
pub async fn load_or_enumerate<B>(browser: &B, config: &Config, refresh: bool) -> Result<Vec<CityRef>>
where
    B: Browser + ?Sized,
{
    let list = CityList::new(&config.output.city_csv);

    if !refresh {
        let saved = list.load()?;
        if !saved.is_empty() {
            return Ok(saved);
        }
    }

    let cities = CityEnumerator::new(config)
        .enumerate(browser)
        .await
        .context("Failed to enumerate cities")?;
    list.save(&cities)?;

    Ok(cities)
}

/// Prints the city list, enumerating it first when needed.
pub struct CitiesCommand {
    config: Config,
    refresh: bool,
}

impl CitiesCommand {
    pub fn new(config: Config, refresh: bool) -> Self {
        Self { config, refresh }
    }

    /// Executes the command and returns formatted output.
    ///
    /// The browser is only started when the list has to be enumerated.
    pub async fn execute(&self) -> Result<String> {
        if !self.refresh {
            let saved = CityList::new(&self.config.output.city_csv).load()?;
            if !saved.is_empty() {
                return Ok(Formatter::new(self.config.format).format_cities(&saved));
            }
        }

        let browser =
            WebDriverBrowser::connect(&self.config).await.context("Failed to start browser")?;
        let outcome = self.execute_with_browser(&browser).await;
        if let Err(e) = browser.quit().await {
            warn!("{:#}", e);
        }
        outcome
    }

    /// Executes the command with a provided browser (for testing).
    pub async fn execute_with_browser(&self, browser: &impl Browser) -> Result<String> {
        let cities = load_or_enumerate(browser, &self.config, self.refresh).await?;
        Ok(Formatter::new(self.config.format).format_cities(&cities))
    }
}
