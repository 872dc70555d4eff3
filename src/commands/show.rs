//! Show command: prints stored hotel records.

use crate::config::Config;
use crate::format::Formatter;
use crate::store::HotelStore;
use anyhow::{Context, Result};
use tracing::debug;

/// Prints the hotel output, optionally narrowed to one hotel code.
pub struct ShowCommand {
    config: Config,
    code: Option<String>,
}

impl ShowCommand {
    pub fn new(config: Config, code: Option<String>) -> Self {
        Self { config, code }
    }

    pub fn execute(&self) -> Result<String> {
        let store = HotelStore::new(&self.config);
        let mut records = store.records().context("Failed to read hotel output")?;
        debug!("Read {} stored hotels", records.len());

        let formatter = Formatter::new(self.config.format);

        let Some(code) = &self.code else {
            return Ok(formatter.format_records(&records));
        };

        let code = code.to_lowercase();
        records.retain(|r| r.hotel_code.as_deref() == Some(code.as_str()));

        match records.as_slice() {
            [record] => Ok(formatter.format_record(record)),
            _ => Ok(formatter.format_records(&records)),
        }
    }
}
