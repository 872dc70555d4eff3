//! Resumable on-disk state: the city list and the hotel output files.

mod cities;

pub use cities::CityList;

use crate::config::{Config, OutputPaths};
use crate::format::delimited;
use crate::ihg::models::FIELDS;
use crate::ihg::{HotelRecord, RecordKey};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Hotel records keyed by identity, in output order.
pub type RecordMap = IndexMap<RecordKey, HotelRecord>;

/// Hotel output store (JSON plus CSV), rewritten in full on every persist.
pub struct HotelStore {
    paths: OutputPaths,
    overwrite: bool,
}

impl HotelStore {
    pub fn new(config: &Config) -> Self {
        Self { paths: config.output.clone(), overwrite: config.overwrite }
    }

    /// Loads the prior JSON output.
    ///
    /// Returns an empty map when overwriting, when there is no prior output,
    /// or when it cannot be read.
    pub fn load(&self) -> RecordMap {
        if self.overwrite {
            debug!("Overwrite enabled, ignoring prior output");
            return RecordMap::new();
        }

        match self.records() {
            Ok(records) => {
                if !records.is_empty() {
                    info!("Loaded {} hotels from {}", records.len(), self.paths.hotel_json.display());
                }
                records.into_iter().map(|r| (r.key(), r)).collect()
            }
            Err(e) => {
                warn!("Ignoring unreadable output: {:#}", e);
                RecordMap::new()
            }
        }
    }

    /// Reads the JSON output as stored. A missing file reads as no records.
    pub fn records(&self) -> Result<Vec<HotelRecord>> {
        let path = &self.paths.hotel_json;
        if !path.exists() {
            return Ok(Vec::new());
        }
        read_records(path)
    }

    /// Merges freshly scraped records into a copy of `existing`.
    ///
    /// Known keys are only replaced when overwriting, and keep their position.
    pub fn merge(&self, new: Vec<HotelRecord>, existing: &RecordMap) -> RecordMap {
        let mut merged = existing.clone();

        for record in new {
            let key = record.key();
            if merged.contains_key(&key) && !self.overwrite {
                debug!("Keeping existing record for {:?}", key);
                continue;
            }
            merged.insert(key, record);
        }

        merged
    }

    /// Writes every record to the JSON and CSV outputs.
    ///
    /// An empty map leaves existing files untouched.
    pub fn persist(&self, records: &RecordMap) -> Result<()> {
        if records.is_empty() {
            debug!("Nothing to persist");
            return Ok(());
        }

        let values: Vec<&HotelRecord> = records.values().collect();

        let json = serde_json::to_string_pretty(&values).context("Failed to serialize hotels")?;
        write_file(&self.paths.hotel_json, &json)?;

        let table = delimited::to_csv_string(&FIELDS, values.iter().map(|r| r.csv_row()))
            .context("Failed to render hotel CSV")?;
        write_file(&self.paths.hotel_csv, &table)?;

        debug!("Persisted {} hotels", records.len());
        Ok(())
    }

    pub fn paths(&self) -> &OutputPaths {
        &self.paths
    }
}

fn read_records(path: &Path) -> Result<Vec<HotelRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Writes `content` to `path`, creating parent directories.
pub(crate) fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
