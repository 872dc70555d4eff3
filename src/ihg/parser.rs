//! HTML parser for IHG landing, listing, detail and sub-pages.
//!
//! Every probe works on a page snapshot and returns `Option`; a missing
//! element is not an error.

use crate::ihg::models::{AmenitiesPage, CityRef, HotelCard, HotelDetail, ParkingInfo, PetPolicy};
use crate::ihg::selectors::{amenities, detail, landing, listing, pets};
use indexmap::IndexMap;
use regex_lite::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::trace;
use url::Url;

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\d[\d\-() .]{7,}\d").unwrap());

static HOTEL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z0-9]{5}$").unwrap());

/// Fewer digits than this is a date, a price or a street number.
const MIN_PHONE_DIGITS: usize = 9;

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p",
    "section", "table", "tbody", "td", "th", "thead", "tr", "ul",
];

const HIDDEN_TAGS: &[&str] = &["head", "noscript", "script", "style", "template"];

/// A parsed page snapshot plus the URL it was taken from.
pub struct PageParser {
    document: Html,
    base: Option<Url>,
}

impl PageParser {
    pub fn new(html: &str, url: &str) -> Self {
        Self { document: Html::parse_document(html), base: Url::parse(url).ok() }
    }

    /// City links from the explore page, deduplicated by href in page order.
    pub fn city_links(&self) -> Vec<CityRef> {
        let mut seen = HashSet::new();
        let mut cities = Vec::new();

        for link in self.document.select(&landing::CITY_LINK) {
            let Some(href) = link.value().attr("href").map(|h| self.resolve(h)) else {
                continue;
            };
            if href.is_empty() || !seen.insert(href.clone()) {
                continue;
            }
            if !is_city_href(&href) {
                trace!("Ignoring non-city link {}", href);
                continue;
            }
            cities.push(CityRef::new(inline_text(link), href));
        }

        cities
    }

    /// Hotel cards on a city listing page. Cards without a title link are skipped.
    pub fn hotel_cards(&self) -> Vec<HotelCard> {
        let mut cards = Vec::new();

        for card in self.document.select(&listing::CARD) {
            let Some(title) = card.select(&listing::TITLE_LINK).next() else {
                trace!("Skipping card without title link");
                continue;
            };

            let amenities = card
                .select(&listing::AMENITY)
                .map(inline_text)
                .filter(|label| !label.is_empty())
                .collect();

            cards.push(HotelCard {
                name: inline_text(title),
                detail_url: title.value().attr("href").map(|h| self.resolve(h)).unwrap_or_default(),
                address: first_text(card, &listing::ADDRESS),
                amenities,
                price: first_text(card, &listing::PRICE_VALUE),
                currency: first_text(card, &listing::PRICE_CURRENCY),
                rating: first_text(card, &listing::RATING),
            });
        }

        cards
    }

    /// Longest qualifying description block, falling back to the longest paragraph.
    pub fn description(&self) -> Option<String> {
        let mut best: Option<String> = None;

        for group in detail::DESCRIPTION_GROUPS.iter() {
            let candidate = longest(
                self.document
                    .select(group)
                    .map(render_text)
                    .filter(|text| text.chars().count() > detail::MIN_DESCRIPTION_CHARS),
            );
            if let Some(text) = candidate {
                let longer = best.as_ref().map_or(true, |b| text.chars().count() > b.chars().count());
                if longer {
                    best = Some(text);
                }
            }
        }

        best.or_else(|| {
            longest(
                self.document
                    .select(&detail::PARAGRAPH)
                    .map(render_text)
                    .filter(|text| !text.is_empty()),
            )
        })
    }

    /// Titles of the highlighted amenities on the detail page.
    pub fn highlights(&self) -> Option<Vec<String>> {
        let titles: Vec<String> = self
            .document
            .select(&detail::HIGHLIGHT_TITLE)
            .map(inline_text)
            .filter(|title| !title.is_empty())
            .collect();

        non_empty(titles)
    }

    /// First `tel:` link, otherwise the first phone-like run in the page text.
    pub fn phone(&self) -> Option<String> {
        let from_link = self.document.select(&detail::TEL_LINK).find_map(|a| {
            let number = a.value().attr("href")?.replace("tel:", "");
            let number = number.trim();
            (!number.is_empty()).then(|| number.to_string())
        });
        if from_link.is_some() {
            return from_link;
        }

        let body = self.body_text();
        PHONE
            .find_iter(&body)
            .map(|m| m.as_str().trim())
            .find(|candidate| digit_count(candidate) >= MIN_PHONE_DIGITS)
            .map(str::to_string)
    }

    /// Href of the first link whose text contains one of `labels`.
    ///
    /// Only the first labelled link counts; if its href is empty there is no link.
    pub fn action_link(&self, selector: &Selector, labels: &[&str]) -> Option<String> {
        let link = self.document.select(selector).find(|a| {
            let text = inline_text(*a).to_lowercase();
            labels.iter().any(|label| text.contains(label))
        })?;

        let href = link.value().attr("href")?.trim();
        if href.is_empty() {
            trace!("Action link {:?} has no href", labels);
            return None;
        }
        Some(self.resolve(href))
    }

    /// All probes run on the "all amenities" page.
    pub fn amenities_page(&self) -> AmenitiesPage {
        AmenitiesPage {
            amenities: self.amenity_list(),
            parking: self
                .section_text(amenities::PARKING_KEYWORDS)
                .map(|parking_info| ParkingInfo { parking_info }),
            overview: self.overview_table(),
            nearby: self.section_lines(amenities::NEARBY_KEYWORDS),
            airport: self.section_lines(amenities::AIRPORT_KEYWORDS),
            phone: self.phone(),
        }
    }

    /// Pet policy text from the policy page.
    pub fn pet_policy(&self) -> Option<PetPolicy> {
        self.section_text(amenities::PET_KEYWORDS).map(|policy| PetPolicy { policy })
    }

    fn amenity_list(&self) -> Option<Vec<String>> {
        let mut items: Vec<String> = Vec::new();

        for selector in amenities::ITEMS.iter() {
            for element in self.document.select(selector) {
                let text = inline_text(element);
                if !text.is_empty() && !items.contains(&text) {
                    items.push(text);
                }
            }
        }

        non_empty(items)
    }

    fn overview_table(&self) -> Option<IndexMap<String, String>> {
        let mut table = IndexMap::new();

        let terms: Vec<_> = self.document.select(&amenities::DL_TERM).collect();
        let definitions: Vec<_> = self.document.select(&amenities::DL_DEFINITION).collect();
        if !terms.is_empty() && terms.len() == definitions.len() {
            insert_pairs(&mut table, &terms, &definitions);
        }

        if table.is_empty() {
            for container in self.document.select(&amenities::KV_CONTAINER) {
                let labels: Vec<_> = container.select(&amenities::KV_LABEL).collect();
                let values: Vec<_> = container.select(&amenities::KV_VALUE).collect();
                if !labels.is_empty() && labels.len() == values.len() {
                    insert_pairs(&mut table, &labels, &values);
                }
            }
        }

        (!table.is_empty()).then_some(table)
    }

    /// Longest section mentioning any keyword, or a window of page text
    /// around the first keyword found.
    pub fn section_text(&self, keywords: &[&str]) -> Option<String> {
        let mut texts: Vec<String> = Vec::new();

        for section in self.document.select(&amenities::SECTION) {
            let text = render_text(section);
            let lower = text.to_lowercase();
            if keywords.iter().any(|k| lower.contains(k)) && !texts.contains(&text) {
                texts.push(text);
            }
        }

        if texts.is_empty() {
            let body = self.body_text();
            if let Some(snippet) = keyword_window(&body, keywords) {
                texts.push(snippet);
            }
        }

        longest(texts.into_iter().filter(|t| !t.is_empty()))
    }

    /// [`section_text`](Self::section_text) split into trimmed lines.
    pub fn section_lines(&self, keywords: &[&str]) -> Option<Vec<String>> {
        let text = self.section_text(keywords)?;
        let lines = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.trim_matches(|c| matches!(c, ' ' | '-' | '•' | '\t')).to_string())
            .filter(|line| !line.is_empty())
            .collect();

        non_empty(lines)
    }

    fn body_text(&self) -> String {
        self.document.select(&detail::BODY).next().map(render_text).unwrap_or_default()
    }

    fn resolve(&self, href: &str) -> String {
        let href = href.trim();
        self.base
            .as_ref()
            .and_then(|base| base.join(href).ok())
            .map(|url| url.to_string())
            .unwrap_or_else(|| href.to_string())
    }
}

/// Decides pet-friendliness when the hotel has no pet-policy page.
pub fn infer_pet_friendly(detail: &HotelDetail) -> bool {
    if detail.pets.is_some() {
        return true;
    }

    let description = detail.description.as_deref().unwrap_or("").to_lowercase();
    if pets::DESCRIPTION_HINTS.iter().any(|hint| description.contains(hint)) {
        return true;
    }

    detail.amenities.as_ref().is_some_and(|items| {
        let hay = items.join(" ").to_lowercase();
        pets::AMENITY_HINTS.iter().any(|hint| hay.contains(hint))
    })
}

/// Hotel code from a detail URL, e.g. `miaep` from `.../miami/miaep/hoteldetail`.
///
/// Without a code right before `hoteldetail`, the first five-character
/// segment is used, then the last meaningful path segment. Neither fallback
/// is guaranteed to be a real hotel code.
pub fn hotel_code_from_url(url: &str) -> Option<String> {
    if url.trim().is_empty() {
        return None;
    }

    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    let segments: Vec<&str> = path.trim_end_matches('/').split('/').collect();

    // Canonical shape: .../{city}/{code}/hoteldetail[/...]
    let before_detail = segments
        .iter()
        .position(|s| s.eq_ignore_ascii_case("hoteldetail"))
        .and_then(|i| i.checked_sub(1))
        .map(|i| segments[i])
        .filter(|s| HOTEL_CODE.is_match(s));
    if let Some(code) = before_detail {
        return Some(code.to_lowercase());
    }

    if let Some(code) = segments.iter().find(|s| HOTEL_CODE.is_match(s)) {
        return Some(code.to_lowercase());
    }

    segments
        .iter()
        .rev()
        .map(|s| s.to_lowercase())
        .find(|s| !s.is_empty() && s != "hoteldetail" && s != "amenities")
}

fn is_city_href(href: &str) -> bool {
    let lower = href.to_lowercase();
    lower.contains(landing::DOMAIN_MARKER)
        && landing::PATH_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Visible text of an element, one normalized line per block.
pub fn render_text(element: ElementRef) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                let Some(child) = ElementRef::wrap(child) else { continue };
                let name = child.value().name();
                if HIDDEN_TAGS.contains(&name) {
                    continue;
                }
                let block = BLOCK_TAGS.contains(&name);
                if block {
                    out.push('\n');
                }
                collect_text(child, out);
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// Element text on a single line.
fn inline_text(element: ElementRef) -> String {
    render_text(element).replace('\n', " ")
}

fn first_text(scope: ElementRef, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(inline_text)
        .filter(|text| !text.is_empty())
}

fn insert_pairs(table: &mut IndexMap<String, String>, keys: &[ElementRef], values: &[ElementRef]) {
    for (key, value) in keys.iter().zip(values) {
        let key = inline_text(*key);
        let value = inline_text(*value);
        if !key.is_empty() && !value.is_empty() {
            table.insert(key, value);
        }
    }
}

/// Characters from `WINDOW_BEFORE` before to `WINDOW_AFTER` after the first
/// keyword (in keyword order) found in `text`.
fn keyword_window(text: &str, keywords: &[&str]) -> Option<String> {
    // Per-char lowercasing keeps char positions aligned with `text`.
    let lower: String = text.chars().map(|c| c.to_lowercase().next().unwrap_or(c)).collect();

    let byte_index = keywords.iter().find_map(|k| lower.find(k))?;
    let hit = lower[..byte_index].chars().count();
    let start = hit.saturating_sub(amenities::WINDOW_BEFORE);

    let snippet: String =
        text.chars().skip(start).take(hit + amenities::WINDOW_AFTER - start).collect();
    Some(snippet)
}

/// Longest string; the first one wins a tie.
fn longest(texts: impl IntoIterator<Item = String>) -> Option<String> {
    texts.into_iter().fold(None, |best: Option<String>, text| match best {
        Some(b) if b.chars().count() >= text.chars().count() => Some(b),
        _ => Some(text),
    })
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

fn digit_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_ascii_digit()).count()
}
