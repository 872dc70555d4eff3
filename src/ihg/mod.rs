//! IHG-specific modules for page parsing, selectors, and data models.

pub mod models;
pub mod parser;
pub mod selectors;

pub use models::{CityRef, HotelCard, HotelDetail, HotelRecord, RecordKey};
pub use parser::{hotel_code_from_url, infer_pet_friendly, PageParser};
