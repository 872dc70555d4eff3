//! CSV documents built on the `csv` crate: `\n` line endings, fields quoted
//! only when they need it.

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Terminator, Trim, Writer, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

fn writer() -> Writer<Vec<u8>> {
    WriterBuilder::new().has_headers(false).terminator(Terminator::Any(b'\n')).from_writer(Vec::new())
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("Failed to flush CSV: {}", e))?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

/// Renders a header plus string rows.
pub fn to_csv_string<I>(header: &[&str], rows: I) -> Result<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut w = writer();
    w.write_record(header).context("Failed to write CSV header")?;
    for row in rows {
        w.write_record(&row).context("Failed to write CSV row")?;
    }
    finish(w)
}

/// Renders a header plus one serialized row per item. The header is written
/// even when there are no items.
pub fn serialize_rows<T: Serialize>(header: &[&str], items: &[T]) -> Result<String> {
    let mut w = writer();
    w.write_record(header).context("Failed to write CSV header")?;
    for item in items {
        w.serialize(item).context("Failed to write CSV row")?;
    }
    finish(w)
}

/// Reads rows by header name. Fails when a `required` column is missing;
/// a document without a header yields nothing.
pub fn deserialize_rows<T: DeserializeOwned>(text: &str, required: &[&str]) -> Result<Vec<T>> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).flexible(true).from_reader(text.as_bytes());

    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    if headers.is_empty() || is_blank(&headers) {
        return Ok(Vec::new());
    }
    if let Some(missing) = required.iter().find(|name| !headers.iter().any(|h| h == **name)) {
        anyhow::bail!("CSV header is missing the {} column", missing);
    }

    reader
        .deserialize::<T>()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("Malformed CSV row {}", i + 2)))
        .collect()
}

/// Splits CSV text into raw rows, the header included. Blank lines are dropped.
pub fn parse_rows(text: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new().has_headers(false).flexible(true).from_reader(text.as_bytes());

    reader
        .records()
        .map(|record| {
            let record = record.context("Malformed CSV row")?;
            Ok(record.iter().map(str::to_string).collect())
        })
        .collect()
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(str::is_empty)
}
