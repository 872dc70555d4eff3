use super::write_file;
use crate::format::{delimited, CITY_HEADER};
use crate::ihg::CityRef;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The persisted `city_name,city_url` list.
pub struct CityList {
    path: PathBuf,
}

impl CityList {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the saved cities. A missing file reads as an empty list.
    pub fn load(&self) -> Result<Vec<CityRef>> {
        if !self.path.exists() {
            debug!("No city list at {}", self.path.display());
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        let rows: Vec<CityRef> = delimited::deserialize_rows(&content, &CITY_HEADER)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        let cities: Vec<CityRef> = rows.into_iter().filter(|c| !c.city_url.is_empty()).collect();

        info!("Loaded {} cities from {}", cities.len(), self.path.display());
        Ok(cities)
    }

    /// Writes the header plus one row per city.
    pub fn save(&self, cities: &[CityRef]) -> Result<()> {
        let content = delimited::serialize_rows(&CITY_HEADER, cities)
            .with_context(|| format!("Failed to render {}", self.path.display()))?;
        write_file(&self.path, &content)?;

        info!("Saved {} cities to {}", cities.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let list = CityList::new(dir.path().join("cities.csv"));
        assert!(list.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let list = CityList::new(dir.path().join("cities.csv"));
        let cities = vec![
            CityRef::new("Miami", "https://www.ihg.com/explore/pet-friendly-hotels/miami"),
            CityRef::new("Washington, D.C.", "https://www.ihg.com/explore/pet-friendly-hotels/dc"),
        ];

        list.save(&cities).unwrap();
        assert_eq!(list.load().unwrap(), cities);
    }

    #[test]
    fn test_save_empty_writes_header() {
        let dir = TempDir::new().unwrap();
        let list = CityList::new(dir.path().join("cities.csv"));

        list.save(&[]).unwrap();

        assert_eq!(fs::read_to_string(list.path()).unwrap(), "city_name,city_url\n");
        assert!(list.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_skips_rows_without_url() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cities.csv");
        fs::write(&path, "city_url,city_name\r\nhttps://x/miami,Miami\r\n,Nowhere\r\n").unwrap();

        let cities = CityList::new(&path).load().unwrap();
        assert_eq!(cities, vec![CityRef::new("Miami", "https://x/miami")]);
    }

    #[test]
    fn test_load_rejects_unknown_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cities.csv");
        fs::write(&path, "name,url\nMiami,https://x/miami\n").unwrap();

        assert!(CityList::new(&path).load().is_err());
    }
}
