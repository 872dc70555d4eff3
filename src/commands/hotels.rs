//! City listing enumeration.

use crate::browser::{Browser, BrowserError};
use crate::commands::detail::RecordExtractor;
use crate::config::Config;
use crate::ihg::selectors::listing;
use crate::ihg::{hotel_code_from_url, CityRef, HotelRecord, PageParser};
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Turns a city listing page into hotel records, one detail visit per card.
pub struct HotelEnumerator {
    timeout: Duration,
    extractor: RecordExtractor,
}

impl HotelEnumerator {
    pub fn new(config: &Config) -> Self {
        Self { timeout: config.timeout(), extractor: RecordExtractor::new(config) }
    }

    /// Scrapes every hotel card of `city`.
    ///
    /// Errors loading the listing itself are returned. A card whose detail
    /// extraction faults is dropped and the rest continue.
    pub async fn scrape_city<B>(&self, browser: &B, city: &CityRef) -> Result<Vec<HotelRecord>, BrowserError>
    where
        B: Browser + ?Sized,
    {
        browser.goto(&city.city_url).await?;
        self.dismiss_cookies(browser).await;

        if !browser.wait_for(listing::HOTEL_LIST_CSS, self.timeout).await? {
            warn!("No hotel list on {} after {:?}", city.city_url, self.timeout);
        }

        let html = browser.page_source().await?;
        let cards = PageParser::new(&html, &city.city_url).hotel_cards();
        info!("Found {} hotels in {}", cards.len(), city.city_name);

        let mut records = Vec::with_capacity(cards.len());
        for card in cards {
            debug!("Hotel: {} ({})", card.name, card.detail_url);

            let detail = match self.extractor.extract(browser, &card.detail_url).await {
                Ok(detail) => detail,
                Err(e) => {
                    warn!("Skipping {}: {}", card.name, e);
                    continue;
                }
            };

            let mut record = HotelRecord::from_card(&card, hotel_code_from_url(&card.detail_url));
            record.apply_detail(&detail);
            records.push(record);
        }

        Ok(records)
    }

    /// Clicks the first cookie banner button found. Best effort.
    async fn dismiss_cookies<B: Browser + ?Sized>(&self, browser: &B) {
        for (selector, labels) in listing::COOKIE_BUTTONS {
            match browser.click_first(selector, labels).await {
                Ok(true) => {
                    debug!("Dismissed cookie banner via {}", selector);
                    return;
                }
                Ok(false) => {}
                Err(e) => trace!("Cookie button {} failed: {}", selector, e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::mock::MockBrowser;

    const CITY: &str = "https://www.ihg.com/explore/pet-friendly-hotels/miami";
    const HOTEL_X: &str = "https://www.ihg.com/holidayinn/hotels/us/en/miami/miaep/hoteldetail";
    const HOTEL_Y: &str = "https://www.ihg.com/kimpton/hotels/us/en/miami/miaky/hoteldetail";

    fn make_test_config() -> Config {
        Config { settle_ms: 0, settle_jitter_ms: 0, timeout_secs: 1, ..Config::default() }
    }

    fn city() -> CityRef {
        CityRef::new("Miami", CITY)
    }

    fn card(name: &str, href: &str) -> String {
        format!(
            r#"<li>
                <a class="cmp-card__title-link" href="{}">{}</a>
                <address>Miami, FL</address>
                <div class="cmp-amenity-list"><div class="cmp-amenity-list__item">
                    <span class="cmp-image__title">Free WiFi</span>
                </div></div>
                <span class="cmp-card__hotel-price-value">189</span>
                <span class="cmp-card__hotel-price-currency">USD</span>
                <div class="cmp-card__guest-reviews"><span class="cmp-card__rating-count">4.5</span></div>
            </li>"#,
            href, name
        )
    }

    fn listing(cards: &[String]) -> String {
        format!(
            r#"<html><body>
                <button id="onetrust-accept-btn-handler">Accept</button>
                <div id="hotelList"><div><ul>{}</ul></div></div>
            </body></html>"#,
            cards.concat()
        )
    }

    fn detail_page(description: &str) -> String {
        format!(r#"<html><body><div class="description">{}</div></body></html>"#, description)
    }

    #[tokio::test]
    async fn test_scrape_city_builds_records() {
        let description = format!("This pet-friendly hotel sits on the bay. {}", "Walk to the beach. ".repeat(6));
        let browser = MockBrowser::new()
            .with_page(CITY, &listing(&[card("Hotel X", HOTEL_X)]))
            .with_page(HOTEL_X, &detail_page(&description));
        let enumerator = HotelEnumerator::new(&make_test_config());

        let records = enumerator.scrape_city(&browser, &city()).await.unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.hotel_code.as_deref(), Some("miaep"));
        assert_eq!(record.hotel_name.as_deref(), Some("Hotel X"));
        assert_eq!(record.address.as_deref(), Some("Miami, FL"));
        assert_eq!(record.card_price.as_deref(), Some("189 USD"));
        assert_eq!(record.rating.as_deref(), Some("4.5"));
        assert_eq!(record.amenities_json.as_deref(), Some(r#"["Free WiFi"]"#));
        assert_eq!(record.description.as_deref(), Some(description.trim()));
        assert_eq!(record.is_pet_friendly, Some(true));
        assert!(record.pets_json.is_none());

        assert_eq!(browser.clicks(), vec!["button#onetrust-accept-btn-handler".to_string()]);
        assert_eq!(browser.current_url(), CITY);
    }

    #[tokio::test]
    async fn test_scrape_city_navigation_failure_keeps_card_fields() {
        let browser = MockBrowser::new().with_page(CITY, &listing(&[card("Hotel X", HOTEL_X)]));
        browser.fail_navigation(HOTEL_X);
        let enumerator = HotelEnumerator::new(&make_test_config());

        let records = enumerator.scrape_city(&browser, &city()).await.unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.hotel_code.as_deref(), Some("miaep"));
        assert_eq!(record.hotel_name.as_deref(), Some("Hotel X"));
        assert_eq!(record.address.as_deref(), Some("Miami, FL"));
        assert_eq!(record.rating.as_deref(), Some("4.5"));
        assert_eq!(record.card_price.as_deref(), Some("189 USD"));
        assert_eq!(record.amenities_json.as_deref(), Some(r#"["Free WiFi"]"#));
        assert!(record.last_updated.is_some());

        assert!(record.phone.is_none());
        assert!(record.description.is_none());
        assert!(record.overview_table_json.is_none());
        assert!(record.pets_json.is_none());
        assert!(record.parking_json.is_none());
        assert!(record.nearby_json.is_none());
        assert!(record.airport_json.is_none());
        assert!(record.is_pet_friendly.is_none());
    }

    #[tokio::test]
    async fn test_scrape_city_skips_faulting_card() {
        let browser = MockBrowser::new()
            .with_page(CITY, &listing(&[card("Hotel X", HOTEL_X), card("Hotel Y", HOTEL_Y)]))
            .with_page(HOTEL_X, &detail_page("Short"))
            .with_page(HOTEL_Y, &detail_page("Also short"));
        browser.fault_on(HOTEL_X);
        let enumerator = HotelEnumerator::new(&make_test_config());

        let records = enumerator.scrape_city(&browser, &city()).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].hotel_name.as_deref(), Some("Hotel Y"));
        assert_eq!(records[0].hotel_code.as_deref(), Some("miaky"));
        assert_eq!(records[0].is_pet_friendly, Some(false));
    }

    #[tokio::test]
    async fn test_scrape_city_without_hotel_list() {
        let browser = MockBrowser::new().with_page(CITY, "<html><body><p>Sold out</p></body></html>");
        let enumerator = HotelEnumerator::new(&make_test_config());

        let records = enumerator.scrape_city(&browser, &city()).await.unwrap();

        assert!(records.is_empty());
        assert!(browser.clicks().is_empty());
    }

    #[tokio::test]
    async fn test_scrape_city_propagates_listing_failure() {
        let browser = MockBrowser::new();
        browser.fail_navigation(CITY);
        let enumerator = HotelEnumerator::new(&make_test_config());

        let result = enumerator.scrape_city(&browser, &city()).await;

        assert!(matches!(result, Err(BrowserError::Navigation { .. })));
    }

    #[tokio::test]
    async fn test_cookie_banner_by_label() {
        let page = r#"<html><body>
            <button>Manage</button><button>I Agree</button>
            <div id="hotelList"><div><ul></ul></div></div>
        </body></html>"#;
        let browser = MockBrowser::new().with_page(CITY, page);
        let enumerator = HotelEnumerator::new(&make_test_config());

        enumerator.scrape_city(&browser, &city()).await.unwrap();

        assert_eq!(browser.clicks(), vec!["button".to_string()]);
    }
}
