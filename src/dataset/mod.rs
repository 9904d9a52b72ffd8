//! Input and output datasets and their CSV representation.

pub mod cleaner;

use std::path::Path;
use thiserror::Error;
use tracing::info;

pub const TITLE_COLUMN: &str = "Title";
pub const ARTIST_COLUMN: &str = "Artist";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("Row {row} has {actual} fields, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Row {0} has an empty title")]
    EmptyTitle(usize),

    #[error("Got enriched values for {actual} rows, dataset has {expected}")]
    RowCount { expected: usize, actual: usize },
}

/// One input record. Every original field is kept in header order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    title: String,
    artist: String,
    values: Vec<String>,
}

impl Row {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// The songs to enrich, as read from disk.
#[derive(Debug, Clone)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Build a dataset from a header row and records, validating that `Title`
    /// and `Artist` exist and every title is non-empty.
    pub fn new(headers: Vec<String>, records: Vec<Vec<String>>) -> Result<Self, DatasetError> {
        let title_idx = column_index(&headers, TITLE_COLUMN)?;
        let artist_idx = column_index(&headers, ARTIST_COLUMN)?;

        let rows = records
            .into_iter()
            .enumerate()
            .map(|(i, values)| {
                if values.len() != headers.len() {
                    return Err(DatasetError::RowWidth {
                        row: i,
                        expected: headers.len(),
                        actual: values.len(),
                    });
                }
                let title = values[title_idx].trim().to_string();
                if title.is_empty() {
                    return Err(DatasetError::EmptyTitle(i));
                }
                Ok(Row {
                    title,
                    artist: values[artist_idx].trim().to_string(),
                    values,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { headers, rows })
    }

    /// Dataset with just `Title` and `Artist` columns.
    pub fn from_songs(songs: &[(&str, &str)]) -> Result<Self, DatasetError> {
        Self::new(
            vec![TITLE_COLUMN.to_string(), ARTIST_COLUMN.to_string()],
            songs
                .iter()
                .map(|(title, artist)| vec![title.to_string(), artist.to_string()])
                .collect(),
        )
    }

    pub fn load_csv(path: &Path) -> Result<Self, DatasetError> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect::<Vec<_>>();
        let records = reader
            .records()
            .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
            .collect::<Result<Vec<Vec<String>>, _>>()?;
        let dataset = Self::new(headers, records)?;
        info!("Loaded {} rows from {:?}", dataset.len(), path);
        Ok(dataset)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn column_index(headers: &[String], name: &'static str) -> Result<usize, DatasetError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or(DatasetError::MissingColumn(name))
}

/// Input rows with the enriched columns appended. `None` cells are nulls.
#[derive(Debug, Clone)]
pub struct OutputDataset {
    headers: Vec<String>,
    records: Vec<Vec<Option<String>>>,
}

impl OutputDataset {
    /// Append `enriched_headers` to the input headers and each row of
    /// `enriched_rows` to the matching input row.
    ///
    /// `enriched_rows` must hold one entry per input row, in input order.
    pub fn assemble(
        input: &Dataset,
        enriched_headers: Vec<String>,
        enriched_rows: Vec<Vec<Option<String>>>,
    ) -> Result<Self, DatasetError> {
        if input.len() != enriched_rows.len() {
            return Err(DatasetError::RowCount {
                expected: input.len(),
                actual: enriched_rows.len(),
            });
        }
        let mut headers = input.headers().to_vec();
        headers.extend(enriched_headers);

        let records = input
            .rows()
            .iter()
            .zip(enriched_rows)
            .map(|(row, enriched)| {
                row.values()
                    .iter()
                    .cloned()
                    .map(Some)
                    .chain(enriched)
                    .collect()
            })
            .collect();

        Ok(Self { headers, records })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Vec<Option<String>>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Value of `column` in row `row`; `None` for nulls and unknown columns.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.headers.iter().position(|h| h == column)?;
        self.records.get(row)?.get(idx)?.as_deref()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// Write as CSV, nulls as empty cells.
    pub fn save_csv(&self, path: &Path) -> Result<(), DatasetError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.headers)?;
        for record in &self.records {
            writer.write_record(record.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
        }
        writer.flush()?;
        info!("Wrote {} rows to {:?}", self.records.len(), path);
        Ok(())
    }
}
