//! CSV Row Reader
//!
//! Parses `listings.csv` (header row required) into `Row`s. Rows may be
//! short; absent and empty cells both read as `None`.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::domain::Row;

/// Read every row of the CSV file at `path`.
pub fn load_rows(path: impl AsRef<Path>) -> Result<Vec<Row>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open listings file: {}", path.display()))?;

    let rows = parse_rows(file)
        .with_context(|| format!("Failed to parse listings file: {}", path.display()))?;

    info!(path = %path.display(), rows = rows.len(), "Listing rows loaded");
    Ok(rows)
}

/// Parse CSV rows from any reader.
pub fn parse_rows<R: Read>(reader: R) -> Result<Vec<Row>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    rdr.deserialize::<Row>()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("Malformed CSV record {}", i + 1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows() {
        let csv = "\
title,description,price,quantity,currency,tags,image_url
Sword,A sharp sword,4.99,3,,\"rare,epic\",https://img/sword.png
Shield,Sturdy,10,,EUR,,https://img/shield.png
";
        let rows = parse_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].title.as_deref(), Some("Sword"));
        assert_eq!(rows[0].tags.as_deref(), Some("rare,epic"));
        assert_eq!(rows[0].currency, None);

        assert_eq!(rows[1].quantity, None);
        assert_eq!(rows[1].currency.as_deref(), Some("EUR"));
        assert_eq!(rows[1].tags, None);
    }

    #[test]
    fn test_missing_column_reads_as_none() {
        let csv = "title,description,price\nSword,Sharp,4.99\n";
        let rows = parse_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].image_url, None);
    }

    #[test]
    fn test_short_row_is_accepted() {
        let csv = "title,description,price,image_url\nSword,Sharp\n";
        let rows = parse_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].price, None);
    }

    #[test]
    fn test_missing_file() {
        assert!(load_rows("does/not/exist.csv").is_err());
    }
}
