//! ihg-crawler - Resumable IHG pet-friendly hotel crawler
//!
//! Enumerates city collections, visits each hotel's detail pages through a
//! WebDriver browser, and merges the results into JSON and CSV outputs.

pub mod browser;
pub mod commands;
pub mod config;
pub mod format;
pub mod ihg;
pub mod store;

pub use browser::{Browser, BrowserError};
pub use config::Config;
pub use ihg::models::{CityRef, HotelRecord, RecordKey};
