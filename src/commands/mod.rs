//! CLI command implementations and the scraping stages behind them.

pub mod cities;
pub mod detail;
pub mod hotels;
pub mod scrape;
pub mod show;

pub use cities::{CitiesCommand, CityEnumerator};
pub use detail::RecordExtractor;
pub use hotels::HotelEnumerator;
pub use scrape::{ScrapeCommand, ScrapeSummary};
pub use show::ShowCommand;
