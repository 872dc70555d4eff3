//! Hotel detail extraction.

use crate::browser::{follow_and_return, in_detail_tab, Browser, BrowserError};
use crate::config::Config;
use crate::ihg::selectors::detail;
use crate::ihg::{infer_pet_friendly, HotelDetail, PageParser};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Reads one hotel's detail page and its amenities and pet-policy sub-pages.
pub struct RecordExtractor {
    timeout: Duration,
}

/// What the detail page itself yields before any sub-page is visited.
struct DetailSnapshot {
    detail: HotelDetail,
    amenities_link: Option<String>,
    pet_policy_link: Option<String>,
}

impl RecordExtractor {
    pub fn new(config: &Config) -> Self {
        Self { timeout: config.timeout() }
    }

    /// Extracts detail fields for the hotel at `url` inside a separate tab.
    ///
    /// A page that fails to load yields an empty detail. Driver faults on the
    /// detail page itself are returned; the detail tab is closed either way.
    pub async fn extract<B>(&self, browser: &B, url: &str) -> Result<HotelDetail, BrowserError>
    where
        B: Browser + ?Sized,
    {
        if url.trim().is_empty() {
            debug!("No detail URL, skipping detail page");
            return Ok(HotelDetail::default());
        }

        in_detail_tab(browser, || async move {
            match browser.goto(url).await {
                Ok(()) => self.read_detail_page(browser, url).await,
                Err(e) if e.is_navigation() => {
                    warn!("{}", e);
                    Ok(HotelDetail::default())
                }
                Err(e) => Err(e),
            }
        })
        .await
    }

    async fn read_detail_page<B>(&self, browser: &B, url: &str) -> Result<HotelDetail, BrowserError>
    where
        B: Browser + ?Sized,
    {
        match browser.click_first(detail::READ_MORE_CSS, detail::READ_MORE_LABELS).await {
            Ok(true) => trace!("Expanded description"),
            Ok(false) => {}
            Err(e) => debug!("Description expansion failed: {}", e),
        }

        let html = browser.page_source().await?;
        let DetailSnapshot { mut detail, amenities_link, pet_policy_link } = snapshot(&html, url);

        if let Some(link) = amenities_link {
            debug!("Following amenities page {}", link);
            let page = follow_and_return(
                browser,
                detail::AMENITIES_LINK_CSS,
                detail::AMENITIES_LINK_LABELS,
                self.timeout,
                || async move {
                    let html = browser.page_source().await?;
                    let page = PageParser::new(&html, &link).amenities_page();
                    Ok((!page.is_empty()).then_some(page))
                },
            )
            .await;

            if let Some(page) = page {
                detail.absorb_amenities_page(page);
            }
        }

        let policy = match pet_policy_link {
            Some(link) => {
                debug!("Following pet policy page {}", link);
                follow_and_return(
                    browser,
                    detail::PET_POLICY_LINK_CSS,
                    detail::PET_POLICY_LINK_LABELS,
                    self.timeout,
                    || async move {
                        let html = browser.page_source().await?;
                        Ok(PageParser::new(&html, &link).pet_policy())
                    },
                )
                .await
            }
            None => None,
        };

        match policy {
            Some(policy) => {
                detail.pets = Some(policy);
                detail.pet_friendly = Some(true);
            }
            None => detail.pet_friendly = Some(infer_pet_friendly(&detail)),
        }

        Ok(detail)
    }
}

fn snapshot(html: &str, url: &str) -> DetailSnapshot {
    let page = PageParser::new(html, url);

    DetailSnapshot {
        detail: HotelDetail {
            phone: page.phone(),
            description: page.description(),
            amenities: page.highlights(),
            ..Default::default()
        },
        amenities_link: page.action_link(&detail::AMENITIES_LINK, detail::AMENITIES_LINK_LABELS),
        pet_policy_link: page.action_link(&detail::PET_POLICY_LINK, detail::PET_POLICY_LINK_LABELS),
    }
}
