//! Output formatting for cities and hotel records (table, JSON, markdown, CSV).

pub mod delimited;

use crate::config::OutputFormat;
use crate::ihg::models::FIELDS;
use crate::ihg::{CityRef, HotelRecord};

/// Formats cities and hotel records for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the city list.
    pub fn format_cities(&self, cities: &[CityRef]) -> String {
        if cities.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_cities(&[]),
                _ => "No cities found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(cities).unwrap_or_else(|_| "[]".to_string())
            }
            OutputFormat::Table => self.table_cities(cities),
            OutputFormat::Markdown => self.markdown_cities(cities),
            OutputFormat::Csv => self.csv_cities(cities),
        }
    }

    /// Formats a single hotel record.
    pub fn format_record(&self, record: &HotelRecord) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(record).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Table => self.table_single(record),
            OutputFormat::Markdown => self.markdown_single(record),
            OutputFormat::Csv => self.csv_records(std::slice::from_ref(record)),
        }
    }

    /// Formats multiple hotel records.
    pub fn format_records(&self, records: &[HotelRecord]) -> String {
        if records.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_records(&[]),
                _ => "No hotels found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
            }
            OutputFormat::Table => self.table_records(records),
            OutputFormat::Markdown => self.markdown_records(records),
            OutputFormat::Csv => self.csv_records(records),
        }
    }

    // Table formatting

    fn table_cities(&self, cities: &[CityRef]) -> String {
        let name_width = cities.iter().map(|c| c.city_name.chars().count()).max().unwrap_or(0).clamp(4, 40);

        let mut lines = Vec::new();
        lines.push(format!("{:<name_width$}  {}", "City", "URL"));
        lines.push(format!("{:-<name_width$}  {:-<40}", "", ""));

        for city in cities {
            lines.push(format!("{:<name_width$}  {}", truncate(&city.city_name, name_width), city.city_url));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} cities", cities.len()));

        lines.join("\n")
    }

    fn table_single(&self, record: &HotelRecord) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Code:     {}", or_na(&record.hotel_code)));
        lines.push(format!("Name:     {}", or_na(&record.hotel_name)));
        lines.push(format!("Address:  {}", or_na(&record.address)));
        lines.push(format!("Phone:    {}", or_na(&record.phone)));
        lines.push(format!("Rating:   {}", or_na(&record.rating)));
        lines.push(format!("Price:    {}", or_na(&record.card_price)));
        lines.push(format!("Pets:     {}", pets_label(record)));

        if let Some(amenities) = json_list(&record.amenities_json) {
            lines.push(format!("Amenities: {}", amenities.join(", ")));
        }

        if let Some(description) = &record.description {
            lines.push(String::new());
            lines.push(description.clone());
        }

        lines.push(String::new());
        lines.push(format!("Updated:  {}", or_na(&record.last_updated)));

        lines.join("\n")
    }

    fn table_records(&self, records: &[HotelRecord]) -> String {
        let code_width = 8;
        let price_width = 12;
        let rating_width = 6;
        let pets_width = 4;
        let name_width = 50;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<code_width$}  {:<price_width$}  {:<rating_width$}  {:<pets_width$}  {}",
            "Code", "Price", "Rating", "Pets", "Name"
        ));
        lines.push(format!(
            "{:-<code_width$}  {:-<price_width$}  {:-<rating_width$}  {:-<pets_width$}  {:-<name_width$}",
            "", "", "", "", ""
        ));

        for record in records {
            lines.push(format!(
                "{:<code_width$}  {:>price_width$}  {:>rating_width$}  {:<pets_width$}  {}",
                or_na(&record.hotel_code),
                or_na(&record.card_price),
                or_na(&record.rating),
                pets_label(record),
                truncate(or_na(&record.hotel_name), name_width)
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} hotels", records.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_cities(&self, cities: &[CityRef]) -> String {
        let mut lines = Vec::new();

        lines.push("| City | URL |".to_string());
        lines.push("|------|-----|".to_string());

        for city in cities {
            lines.push(format!("| [{}]({}) | {} |", city.city_name, city.city_url, city.city_url));
        }

        lines.push(String::new());
        lines.push(format!("*{} cities found*", cities.len()));

        lines.join("\n")
    }

    fn markdown_single(&self, record: &HotelRecord) -> String {
        let mut lines = Vec::new();

        lines.push(format!("## {}", or_na(&record.hotel_name)));
        lines.push(String::new());

        if let Some(code) = &record.hotel_code {
            lines.push(format!("- **Code:** {}", code));
        }
        if let Some(address) = &record.address {
            lines.push(format!("- **Address:** {}", address));
        }
        if let Some(phone) = &record.phone {
            lines.push(format!("- **Phone:** {}", phone));
        }
        if let Some(rating) = &record.rating {
            lines.push(format!("- **Rating:** {}", rating));
        }
        if let Some(price) = &record.card_price {
            lines.push(format!("- **Price:** {}", price));
        }
        lines.push(format!("- **Pets:** {}", pets_label(record)));

        if let Some(amenities) = json_list(&record.amenities_json) {
            lines.push(format!("- **Amenities:** {}", amenities.join(", ")));
        }

        if let Some(description) = &record.description {
            lines.push(String::new());
            lines.push(description.clone());
        }

        lines.join("\n")
    }

    fn markdown_records(&self, records: &[HotelRecord]) -> String {
        let mut lines = Vec::new();

        lines.push("| Code | Price | Rating | Pets | Name |".to_string());
        lines.push("|------|-------|--------|------|------|".to_string());

        for record in records {
            lines.push(format!(
                "| {} | {} | {} | {} | {} |",
                or_na(&record.hotel_code),
                or_na(&record.card_price),
                or_na(&record.rating),
                pets_label(record),
                truncate(or_na(&record.hotel_name), 40)
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} hotels found*", records.len()));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_cities(&self, cities: &[CityRef]) -> String {
        delimited::serialize_rows(&CITY_HEADER, cities).unwrap_or_default()
    }

    fn csv_records(&self, records: &[HotelRecord]) -> String {
        delimited::to_csv_string(&FIELDS, records.iter().map(HotelRecord::csv_row)).unwrap_or_default()
    }
}

/// Header of the city list file.
pub const CITY_HEADER: [&str; 2] = ["city_name", "city_url"];

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

fn pets_label(record: &HotelRecord) -> &'static str {
    match record.is_pet_friendly {
        Some(true) => "Yes",
        Some(false) => "No",
        None => "?",
    }
}

/// Decodes a JSON-encoded list of strings.
fn json_list(value: &Option<String>) -> Option<Vec<String>> {
    serde_json::from_str(value.as_deref()?).ok()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record() -> HotelRecord {
        HotelRecord {
            hotel_code: Some("miaep".to_string()),
            hotel_name: Some("Holiday Inn Miami Beach-Oceanfront".to_string()),
            address: Some("4333 Collins Ave, Miami Beach, FL".to_string()),
            phone: Some("+1 305-555-0100".to_string()),
            rating: Some("4.3".to_string()),
            description: Some("Oceanfront hotel with a pool.".to_string()),
            card_price: Some("189 USD".to_string()),
            overview_table_json: None,
            pets_json: Some(r#"{"policy":"Dogs, up to 40 lbs"}"#.to_string()),
            parking_json: None,
            amenities_json: Some(r#"["Free WiFi","Pool"]"#.to_string()),
            nearby_json: None,
            airport_json: None,
            is_pet_friendly: Some(true),
            last_updated: Some("2026-10-19T12:00:00.000000".to_string()),
        }
    }

    fn make_minimal_record() -> HotelRecord {
        HotelRecord {
            hotel_code: None,
            hotel_name: Some("Nameless Inn".to_string()),
            address: None,
            phone: None,
            rating: None,
            description: None,
            card_price: None,
            overview_table_json: None,
            pets_json: None,
            parking_json: None,
            amenities_json: None,
            nearby_json: None,
            airport_json: None,
            is_pet_friendly: None,
            last_updated: None,
        }
    }

    fn make_cities() -> Vec<CityRef> {
        vec![
            CityRef::new("Miami", "https://www.ihg.com/explore/pet-friendly-hotels/miami"),
            CityRef::new("Austin, TX", "https://www.ihg.com/explore/pet-friendly-hotels/austin"),
        ]
    }

    // City tests

    #[test]
    fn test_cities_table() {
        let output = Formatter::new(OutputFormat::Table).format_cities(&make_cities());
        assert!(output.contains("City"));
        assert!(output.contains("Miami"));
        assert!(output.contains("https://www.ihg.com/explore/pet-friendly-hotels/austin"));
        assert!(output.contains("Total: 2 cities"));
    }

    #[test]
    fn test_cities_csv_quotes_commas() {
        let output = Formatter::new(OutputFormat::Csv).format_cities(&make_cities());
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "city_name,city_url");
        assert_eq!(lines[2], "\"Austin, TX\",https://www.ihg.com/explore/pet-friendly-hotels/austin");
    }

    #[test]
    fn test_cities_json() {
        let output = Formatter::new(OutputFormat::Json).format_cities(&make_cities());
        let parsed: Vec<CityRef> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, make_cities());
    }

    #[test]
    fn test_cities_markdown() {
        let output = Formatter::new(OutputFormat::Markdown).format_cities(&make_cities());
        assert!(output.contains("| City | URL |"));
        assert!(output.contains("*2 cities found*"));
    }

    #[test]
    fn test_empty_cities() {
        assert_eq!(Formatter::new(OutputFormat::Json).format_cities(&[]), "[]");
        assert_eq!(Formatter::new(OutputFormat::Csv).format_cities(&[]), "city_name,city_url\n");
        assert_eq!(Formatter::new(OutputFormat::Table).format_cities(&[]), "No cities found.");
    }

    // Record tests

    #[test]
    fn test_table_single_record() {
        let output = Formatter::new(OutputFormat::Table).format_record(&make_record());
        assert!(output.contains("Code:     miaep"));
        assert!(output.contains("Phone:    +1 305-555-0100"));
        assert!(output.contains("Pets:     Yes"));
        assert!(output.contains("Amenities: Free WiFi, Pool"));
        assert!(output.contains("Oceanfront hotel with a pool."));
    }

    #[test]
    fn test_table_single_minimal_record() {
        let output = Formatter::new(OutputFormat::Table).format_record(&make_minimal_record());
        assert!(output.contains("Code:     N/A"));
        assert!(output.contains("Pets:     ?"));
        assert!(!output.contains("Amenities"));
    }

    #[test]
    fn test_table_records() {
        let output = Formatter::new(OutputFormat::Table)
            .format_records(&[make_record(), make_minimal_record()]);
        assert!(output.contains("Code"));
        assert!(output.contains("miaep"));
        assert!(output.contains("189 USD"));
        assert!(output.contains("Nameless Inn"));
        assert!(output.contains("Total: 2 hotels"));
    }

    #[test]
    fn test_table_truncates_long_names() {
        let mut record = make_record();
        record.hotel_name = Some("Résidence ".repeat(10));
        let output = Formatter::new(OutputFormat::Table).format_records(&[record]);
        assert!(output.contains("..."));
    }

    #[test]
    fn test_markdown_single_record() {
        let output = Formatter::new(OutputFormat::Markdown).format_record(&make_record());
        assert!(output.starts_with("## Holiday Inn Miami Beach-Oceanfront"));
        assert!(output.contains("- **Code:** miaep"));
        assert!(output.contains("- **Pets:** Yes"));
    }

    #[test]
    fn test_markdown_records() {
        let output = Formatter::new(OutputFormat::Markdown).format_records(&[make_record()]);
        assert!(output.contains("| Code | Price | Rating | Pets | Name |"));
        assert!(output.contains("| miaep | 189 USD | 4.3 | Yes |"));
        assert!(output.contains("*1 hotels found*"));
    }

    #[test]
    fn test_json_records() {
        let output = Formatter::new(OutputFormat::Json).format_records(&[make_record()]);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["hotel_code"], "miaep");
        assert_eq!(parsed[0]["is_pet_friendly"], "true");
    }

    #[test]
    fn test_csv_records() {
        let output = Formatter::new(OutputFormat::Csv).format_records(&[make_minimal_record()]);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], FIELDS.join(","));
        assert_eq!(lines[1], ",Nameless Inn,,,,,,,,,,,,,");
    }

    #[test]
    fn test_csv_records_quote_json() {
        let output = Formatter::new(OutputFormat::Csv).format_records(&[make_record()]);
        let rows = delimited::parse_rows(&output).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].len(), FIELDS.len());
        assert_eq!(rows[1][8], r#"{"policy":"Dogs, up to 40 lbs"}"#);
        assert_eq!(rows[1][13], "true");
    }

    #[test]
    fn test_empty_records() {
        assert_eq!(Formatter::new(OutputFormat::Json).format_records(&[]), "[]");
        assert_eq!(Formatter::new(OutputFormat::Table).format_records(&[]), "No hotels found.");
        assert_eq!(
            Formatter::new(OutputFormat::Csv).format_records(&[]).trim_end(),
            FIELDS.join(",")
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
        assert_eq!(truncate("ééééééééé", 5), "éé...");
    }
}
