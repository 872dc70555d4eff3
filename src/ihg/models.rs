//! Data models for cities, hotel cards, detail pages and output records.

use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column order of the hotel CSV and field order of the JSON records.
pub const FIELDS: [&str; 15] = [
    "hotel_code",
    "hotel_name",
    "address",
    "phone",
    "rating",
    "description",
    "card_price",
    "overview_table_json",
    "pets_json",
    "parking_json",
    "amenities_json",
    "nearby_json",
    "airport_json",
    "is_pet_friendly",
    "last_updated",
];

/// A named link to a city-level hotel listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRef {
    pub city_name: String,
    pub city_url: String,
}

impl CityRef {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self { city_name: name.into(), city_url: url.into() }
    }
}

/// Fields read from a hotel card on a city listing page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotelCard {
    pub name: String,
    /// Absolute detail page URL (empty if the card link has no href)
    pub detail_url: String,
    pub address: Option<String>,
    pub amenities: Vec<String>,
    pub price: Option<String>,
    pub currency: Option<String>,
    pub rating: Option<String>,
}

impl HotelCard {
    /// Price and currency joined, e.g. "189 USD". None without a price.
    pub fn card_price(&self) -> Option<String> {
        let price = self.price.as_deref()?;
        let joined = format!("{} {}", price, self.currency.as_deref().unwrap_or(""));
        Some(joined.trim().to_string())
    }
}

/// Pet policy text scraped from the policy page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetPolicy {
    pub policy: String,
}

/// Parking section text from the amenities page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingInfo {
    pub parking_info: String,
}

/// Probes run on the "all amenities" page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AmenitiesPage {
    pub amenities: Option<Vec<String>>,
    pub parking: Option<ParkingInfo>,
    pub overview: Option<IndexMap<String, String>>,
    pub nearby: Option<Vec<String>>,
    pub airport: Option<Vec<String>>,
    pub phone: Option<String>,
}

impl AmenitiesPage {
    /// True when no structured probe found anything. The phone alone does
    /// not count.
    pub fn is_empty(&self) -> bool {
        self.amenities.is_none()
            && self.parking.is_none()
            && self.overview.is_none()
            && self.nearby.is_none()
            && self.airport.is_none()
    }
}

/// Fields read from a hotel's detail pages, in typed form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotelDetail {
    pub phone: Option<String>,
    pub description: Option<String>,
    pub overview: Option<IndexMap<String, String>>,
    pub pets: Option<PetPolicy>,
    pub parking: Option<ParkingInfo>,
    pub amenities: Option<Vec<String>>,
    pub nearby: Option<Vec<String>>,
    pub airport: Option<Vec<String>>,
    pub pet_friendly: Option<bool>,
}

impl HotelDetail {
    /// Folds amenities-page results in. Present values replace earlier ones;
    /// the page's phone only fills a gap.
    pub fn absorb_amenities_page(&mut self, page: AmenitiesPage) {
        if page.amenities.is_some() {
            self.amenities = page.amenities;
        }
        if page.parking.is_some() {
            self.parking = page.parking;
        }
        if page.overview.is_some() {
            self.overview = page.overview;
        }
        if page.nearby.is_some() {
            self.nearby = page.nearby;
        }
        if page.airport.is_some() {
            self.airport = page.airport;
        }
        if self.phone.is_none() {
            self.phone = page.phone;
        }
    }
}

/// Identity of a record across runs: (hotel_code, hotel_name).
///
/// Not globally unique when the code falls back to an arbitrary path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub hotel_code: Option<String>,
    pub hotel_name: Option<String>,
}

/// Flat, fixed-schema representation of one scraped hotel.
///
/// The `*_json` fields hold JSON-encoded text. `is_pet_friendly` is
/// serialized as the string "true" or "false".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelRecord {
    #[serde(default)]
    pub hotel_code: Option<String>,
    #[serde(default)]
    pub hotel_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub card_price: Option<String>,
    #[serde(default, deserialize_with = "json_text::deserialize")]
    pub overview_table_json: Option<String>,
    #[serde(default, deserialize_with = "json_text::deserialize")]
    pub pets_json: Option<String>,
    #[serde(default, deserialize_with = "json_text::deserialize")]
    pub parking_json: Option<String>,
    #[serde(default, deserialize_with = "json_text::deserialize")]
    pub amenities_json: Option<String>,
    #[serde(default, deserialize_with = "json_text::deserialize")]
    pub nearby_json: Option<String>,
    #[serde(default, deserialize_with = "json_text::deserialize")]
    pub airport_json: Option<String>,
    #[serde(default, with = "pet_flag")]
    pub is_pet_friendly: Option<bool>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

impl HotelRecord {
    /// Builds a record from card fields only; detail fields start empty.
    pub fn from_card(card: &HotelCard, hotel_code: Option<String>) -> Self {
        let amenities = if card.amenities.is_empty() { None } else { encode(&card.amenities) };

        Self {
            hotel_code,
            hotel_name: Some(card.name.clone()),
            address: card.address.clone(),
            phone: None,
            rating: card.rating.clone(),
            description: None,
            card_price: card.card_price(),
            overview_table_json: None,
            pets_json: None,
            parking_json: None,
            amenities_json: amenities,
            nearby_json: None,
            airport_json: None,
            is_pet_friendly: None,
            last_updated: Some(now_iso()),
        }
    }

    /// Merges detail fields over card fields. Present detail values win;
    /// absent ones never clear what the card provided.
    pub fn apply_detail(&mut self, detail: &HotelDetail) {
        fill(&mut self.phone, detail.phone.clone());
        fill(&mut self.description, detail.description.clone());
        fill(&mut self.overview_table_json, detail.overview.as_ref().and_then(encode));
        fill(&mut self.pets_json, detail.pets.as_ref().and_then(encode));
        fill(&mut self.parking_json, detail.parking.as_ref().and_then(encode));
        fill(&mut self.amenities_json, detail.amenities.as_ref().and_then(encode));
        fill(&mut self.nearby_json, detail.nearby.as_ref().and_then(encode));
        fill(&mut self.airport_json, detail.airport.as_ref().and_then(encode));
        fill(&mut self.is_pet_friendly, detail.pet_friendly);
    }

    pub fn key(&self) -> RecordKey {
        RecordKey { hotel_code: self.hotel_code.clone(), hotel_name: self.hotel_name.clone() }
    }

    /// Values in [`FIELDS`] order; nulls become empty cells.
    pub fn csv_row(&self) -> Vec<String> {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        vec![
            text(&self.hotel_code),
            text(&self.hotel_name),
            text(&self.address),
            text(&self.phone),
            text(&self.rating),
            text(&self.description),
            text(&self.card_price),
            text(&self.overview_table_json),
            text(&self.pets_json),
            text(&self.parking_json),
            text(&self.amenities_json),
            text(&self.nearby_json),
            text(&self.airport_json),
            self.is_pet_friendly.map(|b| b.to_string()).unwrap_or_default(),
            text(&self.last_updated),
        ]
    }
}

fn fill<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Option<String> {
    serde_json::to_string(value).ok()
}

/// Current UTC time as ISO-8601 without a zone suffix.
pub fn now_iso() -> String {
    Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Accepts JSON text or a nested JSON value and always yields valid JSON text.
mod json_text {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.and_then(normalize))
    }

    pub(super) fn normalize(value: Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(text) => {
                if serde_json::from_str::<Value>(&text).is_ok() {
                    Some(text)
                } else {
                    serde_json::to_string(&text).ok()
                }
            }
            other => serde_json::to_string(&other).ok(),
        }
    }
}

/// Serializes `Option<bool>` as "true"/"false"; reads strings or booleans.
mod pet_flag {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S>(value: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(true) => serializer.serialize_str("true"),
            Some(false) => serializer.serialize_str("false"),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Bool(flag)) => Some(flag),
            Some(Value::String(text)) => match text.trim().to_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        })
    }
}
