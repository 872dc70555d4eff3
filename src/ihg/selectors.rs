//! CSS selectors and keyword sets for IHG pages.
//!
//! This file contains every selector used by the crawler, both the raw CSS
//! handed to the browser and the compiled form used on page snapshots.
//! Update this file when IHG changes their HTML structure.
//!
//! **Update process**: When extraction comes back empty, capture the page
//! source, update selectors, and add a test fixture.

use scraper::Selector;
use std::sync::LazyLock;

fn compile(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

/// Selectors for the explore (landing) page.
pub mod landing {
    use super::*;

    /// Links to city collections.
    pub const CITY_LINK_CSS: &str = "ul.cmp-list a.cmp-list__item-link";

    pub static CITY_LINK: LazyLock<Selector> = LazyLock::new(|| compile(CITY_LINK_CSS));

    /// Every kept href must contain this.
    pub const DOMAIN_MARKER: &str = "ihg.com";

    /// A kept href must also contain one of these (case-insensitive).
    pub const PATH_MARKERS: &[&str] = &["hotels", "/explore/", "/destinations", "pet"];
}

/// Selectors for city listing pages.
pub mod listing {
    use super::*;

    /// Cookie banner buttons, tried in order. Labels restrict by text.
    pub const COOKIE_BUTTONS: &[(&str, &[&str])] = &[
        ("button#onetrust-accept-btn-handler", &[]),
        ("button[aria-label=\"Accept all\"]", &[]),
        ("button", &["accept", "i agree"]),
    ];

    /// Container rendered once the hotel list is ready.
    pub const HOTEL_LIST_CSS: &str = "#hotelList";

    /// One hotel card.
    pub static CARD: LazyLock<Selector> = LazyLock::new(|| compile("#hotelList > div > ul > li"));

    /// Card title link (name + detail URL). Cards without one are skipped.
    pub static TITLE_LINK: LazyLock<Selector> =
        LazyLock::new(|| compile("a.cmp-card__title-link"));

    pub static ADDRESS: LazyLock<Selector> = LazyLock::new(|| compile("address"));

    /// Amenity labels shown on the card.
    pub static AMENITY: LazyLock<Selector> = LazyLock::new(|| {
        compile(".cmp-amenity-list .cmp-amenity-list__item .cmp-image__title")
    });

    pub static PRICE_VALUE: LazyLock<Selector> =
        LazyLock::new(|| compile(".cmp-card__hotel-price-value"));

    pub static PRICE_CURRENCY: LazyLock<Selector> =
        LazyLock::new(|| compile(".cmp-card__hotel-price-currency"));

    pub static RATING: LazyLock<Selector> =
        LazyLock::new(|| compile(".cmp-card__guest-reviews .cmp-card__rating-count"));
}

/// Selectors for hotel detail pages.
pub mod detail {
    use super::*;

    /// Truncated description toggle.
    pub const READ_MORE_CSS: &str = "a.morelink, a.moreLink, a.read-more, a.readmore";
    pub const READ_MORE_LABELS: &[&str] = &["read more", "show more", "see more"];

    /// Description candidates, highest priority first.
    pub static DESCRIPTION_GROUPS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
        [
            "div.hotel-description, div.description, .hotel-overview, \
             .vx-description, .property-description",
            "section#overview, section.overview",
            ".cmp-text, .ihg-copy, .content-copy",
        ]
        .iter()
        .map(|css| compile(css))
        .collect()
    });

    /// Texts this short are navigation or teaser copy, not descriptions.
    pub const MIN_DESCRIPTION_CHARS: usize = 120;

    pub static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| compile("p"));

    pub static HIGHLIGHT_TITLE: LazyLock<Selector> = LazyLock::new(|| {
        compile(".vx-highlight-items .vx-highlight-item .amenity-title")
    });

    pub static TEL_LINK: LazyLock<Selector> = LazyLock::new(|| compile("a[href^=\"tel:\"]"));

    /// "View all amenities" action link.
    pub const AMENITIES_LINK_CSS: &str = "a.cmp-button, a.cmp-teaser__action-link";
    pub const AMENITIES_LINK_LABELS: &[&str] = &["view all amenities"];

    pub static AMENITIES_LINK: LazyLock<Selector> =
        LazyLock::new(|| compile(AMENITIES_LINK_CSS));

    /// "View pet policy" action link.
    pub const PET_POLICY_LINK_CSS: &str = "a.cmp-teaser__action-link.cmp-button, a.cmp-button";
    pub const PET_POLICY_LINK_LABELS: &[&str] = &["pet policy"];

    pub static PET_POLICY_LINK: LazyLock<Selector> =
        LazyLock::new(|| compile(PET_POLICY_LINK_CSS));

    pub static BODY: LazyLock<Selector> = LazyLock::new(|| compile("body"));
}

/// Selectors and keywords for the amenities and pet-policy sub-pages.
pub mod amenities {
    use super::*;

    /// Amenity list items; results of all selectors are merged.
    pub static ITEMS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
        [
            ".amenities-list li",
            ".cmp-amenity-list .cmp-image__title",
            ".cmp-amenity-list__item .cmp-image__title",
            ".amenities .amenity, .amenities li",
            "[data-component=\"amenities\"] li",
        ]
        .iter()
        .map(|css| compile(css))
        .collect()
    });

    /// Blocks scanned by keyword section search.
    pub static SECTION: LazyLock<Selector> = LazyLock::new(|| {
        compile(
            "section, .section, .cmp-section, .content-section, \
             .accordion, .accordion-item",
        )
    });

    pub static DL_TERM: LazyLock<Selector> = LazyLock::new(|| compile("dl dt"));
    pub static DL_DEFINITION: LazyLock<Selector> = LazyLock::new(|| compile("dl dd"));

    /// Generic key/value containers for the overview table.
    pub static KV_CONTAINER: LazyLock<Selector> =
        LazyLock::new(|| compile(".table, .overview, .kv, .grid"));
    pub static KV_LABEL: LazyLock<Selector> = LazyLock::new(|| compile(".label, .key, th"));
    pub static KV_VALUE: LazyLock<Selector> = LazyLock::new(|| compile(".value, td"));

    pub const PARKING_KEYWORDS: &[&str] = &["parking", "valet", "self-parking"];
    pub const NEARBY_KEYWORDS: &[&str] = &["nearby", "attractions", "points of interest"];
    pub const AIRPORT_KEYWORDS: &[&str] = &["airport", "airports", "shuttle"];
    pub const PET_KEYWORDS: &[&str] = &["pet", "pets", "pet policy", "dog", "cat"];

    /// Fallback window around the first keyword hit in the page text.
    pub const WINDOW_BEFORE: usize = 500;
    pub const WINDOW_AFTER: usize = 700;
}

/// Phrases implying a pet-friendly hotel when no policy page exists.
pub mod pets {
    pub const DESCRIPTION_HINTS: &[&str] =
        &["pet-friendly", "pets allowed", "pet friendly", "pet-friendly hotel", "pet policy"];

    pub const AMENITY_HINTS: &[&str] = &["pet", "pets allowed", "pet-friendly"];
}
