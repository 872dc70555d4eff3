//! Scrape command: cities, then hotels per city, persisted after every city.

use crate::browser::{Browser, WebDriverBrowser};
use crate::commands::cities::load_or_enumerate;
use crate::commands::hotels::HotelEnumerator;
use crate::config::Config;
use crate::store::HotelStore;
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Totals from one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub cities: usize,
    pub failed_cities: usize,
    pub scraped: usize,
    pub added: usize,
    pub total: usize,
}

/// Runs the full pipeline.
pub struct ScrapeCommand {
    config: Config,
}

impl ScrapeCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the pipeline and returns a printable summary.
    pub async fn execute(&self) -> Result<String> {
        let browser =
            WebDriverBrowser::connect(&self.config).await.context("Failed to start browser")?;
        let outcome = self.execute_with_browser(&browser).await;
        if let Err(e) = browser.quit().await {
            warn!("{:#}", e);
        }
        outcome
    }

    /// Executes the pipeline with a provided browser (for testing).
    pub async fn execute_with_browser(&self, browser: &impl Browser) -> Result<String> {
        let summary = self.run(browser).await?;
        let paths = &self.config.output;

        let lines = [
            format!("Cities:  {} ({} failed)", summary.cities, summary.failed_cities),
            format!("Scraped: {} hotels ({} new)", summary.scraped, summary.added),
            format!("Total:   {} hotels", summary.total),
            format!("JSON:    {}", paths.hotel_json.display()),
            format!("CSV:     {}", paths.hotel_csv.display()),
        ];
        Ok(lines.join("\n"))
    }

    /// Scrapes every city, merging and persisting after each one.
    ///
    /// A failing city contributes no hotels; the run continues with the next.
    pub async fn run<B>(&self, browser: &B) -> Result<ScrapeSummary>
    where
        B: Browser + ?Sized,
    {
        let mut cities = load_or_enumerate(browser, &self.config, false).await?;
        if self.config.run_one_only {
            cities.truncate(1);
        }

        let store = HotelStore::new(&self.config);
        let mut records = store.load();
        let initial = records.len();

        let enumerator = HotelEnumerator::new(&self.config);
        let mut summary = ScrapeSummary { cities: cities.len(), ..Default::default() };

        for (i, city) in cities.iter().enumerate() {
            info!("[{}/{}] Scraping city: {} -> {}", i + 1, cities.len(), city.city_name, city.city_url);

            let hotels = match enumerator.scrape_city(browser, city).await {
                Ok(hotels) => hotels,
                Err(e) => {
                    warn!("Error scraping city {}: {}", city.city_name, e);
                    summary.failed_cities += 1;
                    Vec::new()
                }
            };

            summary.scraped += hotels.len();
            records = store.merge(hotels, &records);
            store.persist(&records)?;
            info!("Saved total hotels so far: {}", records.len());
        }

        summary.total = records.len();
        summary.added = summary.total - initial;
        info!("Done. Total hotels: {}", summary.total);

        Ok(summary)
    }
}
