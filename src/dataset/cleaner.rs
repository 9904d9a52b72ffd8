//! One-time cleanup of the raw export: put proper column names on it.

use super::DatasetError;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

/// Column names of the raw export, in file order.
pub const CLEAN_HEADERS: [&str; 4] = ["Artist", "Album", "Title", "Date"];

/// A headered table with no schema requirements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

/// Distinct values seen in one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSummary {
    pub name: String,
    pub distinct: BTreeSet<String>,
}

/// Read `raw_path`, replace its header line with `headers` and write the
/// result to `clean_path`.
///
/// The raw export's first line carries no usable column names. When
/// `first_row_is_header` is false it is kept as data instead of dropped.
pub fn clean(
    raw_path: &Path,
    clean_path: &Path,
    headers: &[String],
    first_row_is_header: bool,
) -> Result<Table, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(first_row_is_header)
        .from_path(raw_path)?;

    let records = reader
        .records()
        .enumerate()
        .map(|(i, record)| {
            let record = record?;
            if record.len() != headers.len() {
                return Err(DatasetError::RowWidth {
                    row: i,
                    expected: headers.len(),
                    actual: record.len(),
                });
            }
            Ok(record.iter().map(|v| v.trim().to_string()).collect())
        })
        .collect::<Result<Vec<Vec<String>>, DatasetError>>()?;

    if let Some(parent) = clean_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::Writer::from_path(clean_path)?;
    writer.write_record(headers)?;
    for record in &records {
        writer.write_record(record)?;
    }
    writer.flush()?;

    info!(
        "Cleaned {} rows from {:?} into {:?}",
        records.len(),
        raw_path,
        clean_path
    );

    Ok(Table {
        headers: headers.to_vec(),
        records,
    })
}

/// Per-column sets of distinct values, in header order.
pub fn summarize(table: &Table) -> Vec<ColumnSummary> {
    table
        .headers
        .iter()
        .enumerate()
        .map(|(idx, name)| ColumnSummary {
            name: name.clone(),
            distinct: table
                .records
                .iter()
                .filter_map(|record| record.get(idx).cloned())
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    fn clean_headers() -> Vec<String> {
        CLEAN_HEADERS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_clean_replaces_header_line() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw.csv");
        let cleaned = dir.path().join("data").join("cleaned.csv");
        std::fs::write(
            &raw,
            "Unnamed: 0,Unnamed: 1,Unnamed: 2,Unnamed: 3\n\
             Queen,A Night at the Opera,Bohemian Rhapsody,1975\n\
             Billy Joel,The Stranger,Vienna,1977\n",
        )
        .unwrap();

        let table = clean(&raw, &cleaned, &clean_headers(), true).unwrap();
        assert_eq!(table.records.len(), 2);

        // The cleaned file is valid enricher input.
        let dataset = Dataset::load_csv(&cleaned).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rows()[1].title(), "Vienna");
        assert_eq!(dataset.rows()[1].artist(), "Billy Joel");
    }

    #[test]
    fn test_clean_can_keep_first_row() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw.csv");
        let cleaned = dir.path().join("cleaned.csv");
        std::fs::write(&raw, "Queen,A Night at the Opera,Bohemian Rhapsody,1975\n").unwrap();

        let table = clean(&raw, &cleaned, &clean_headers(), false).unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0][2], "Bohemian Rhapsody");
    }

    #[test]
    fn test_clean_rejects_wrong_width() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw.csv");
        std::fs::write(&raw, "a,b,c\nx,y,z\n").unwrap();

        let result = clean(&raw, &dir.path().join("out.csv"), &clean_headers(), true);
        assert!(matches!(result, Err(DatasetError::RowWidth { .. })));
    }

    #[test]
    fn test_summarize_collects_distinct_values() {
        let table = Table {
            headers: vec!["Artist".to_string(), "Title".to_string()],
            records: vec![
                vec!["Queen".to_string(), "Bohemian Rhapsody".to_string()],
                vec!["Queen".to_string(), "Somebody to Love".to_string()],
            ],
        };

        let summary = summarize(&table);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].name, "Artist");
        assert_eq!(summary[0].distinct.len(), 1);
        assert_eq!(summary[1].distinct.len(), 2);
    }
}
