//! Per-run attribute cache and the column accumulation persisted beside it.

use super::models::{
    EnrichmentResult, RowStatus, SongAttributes, DATE_RELEASED_COLUMN, GENRES_COLUMN,
    STATUS_COLUMN, TEMPO_COLUMN, WELL_KNOWN_METRICS,
};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// What identifies a song in the cache.
///
/// `Title` collapses distinct songs sharing a title into one entry (the
/// artist is ignored). `TitleAndArtist` keys on both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CacheKeyStrategy {
    #[default]
    Title,
    TitleAndArtist,
}

impl CacheKeyStrategy {
    pub fn key(&self, title: &str, artist: &str) -> CacheKey {
        CacheKey {
            title: title.to_string(),
            artist: match self {
                CacheKeyStrategy::Title => None,
                CacheKeyStrategy::TitleAndArtist => Some(artist.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    title: String,
    artist: Option<String>,
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Enriched values, one list per output column, one entry per processed row.
#[derive(Debug, Clone, Default)]
pub struct EnrichedColumns {
    rows: usize,
    date_released: Vec<Option<String>>,
    genres: Vec<Option<String>>,
    tempo: Vec<Option<u32>>,
    /// Well-known categories first, then extra ones in first-seen order.
    metrics: Vec<(String, Vec<Option<String>>)>,
    status: Vec<RowStatus>,
}

impl EnrichedColumns {
    pub fn new() -> Self {
        Self {
            metrics: WELL_KNOWN_METRICS
                .iter()
                .map(|name| (name.to_string(), Vec::new()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Append one row. Failures become a null in every column.
    pub fn push(&mut self, result: &EnrichmentResult, status: RowStatus) {
        let attributes = result.attributes();

        if let Some(attributes) = attributes {
            for category in attributes.metrics().keys() {
                if !self.metrics.iter().any(|(name, _)| name == category) {
                    debug!("Discovered metric category {:?}", category);
                    self.metrics
                        .push((category.clone(), vec![None; self.rows]));
                }
            }
        }

        self.date_released
            .push(attributes.and_then(|a| a.date_released().map(str::to_string)));
        self.genres.push(attributes.map(SongAttributes::genres_joined));
        self.tempo.push(attributes.map(SongAttributes::tempo));
        for (name, values) in &mut self.metrics {
            values.push(attributes.and_then(|a| a.metric(name).map(str::to_string)));
        }
        self.status.push(status);
        self.rows += 1;
    }

    /// Column names in output order.
    pub fn headers(&self, include_status: bool) -> Vec<String> {
        let mut headers = vec![
            DATE_RELEASED_COLUMN.to_string(),
            GENRES_COLUMN.to_string(),
            TEMPO_COLUMN.to_string(),
        ];
        headers.extend(self.metrics.iter().map(|(name, _)| name.clone()));
        if include_status {
            headers.push(STATUS_COLUMN.to_string());
        }
        headers
    }

    /// Cells of row `index`, aligned with [`EnrichedColumns::headers`].
    pub fn row(&self, index: usize, include_status: bool) -> Vec<Option<String>> {
        let mut cells = vec![
            self.date_released[index].clone(),
            self.genres[index].clone(),
            self.tempo[index].map(|t| t.to_string()),
        ];
        cells.extend(self.metrics.iter().map(|(_, values)| values[index].clone()));
        if include_status {
            cells.push(Some(self.status[index].as_str().to_string()));
        }
        cells
    }

    pub fn status(&self, index: usize) -> Option<RowStatus> {
        self.status.get(index).copied()
    }

    /// Column-oriented JSON object: column name -> list of row values.
    pub fn to_json(&self, include_status: bool) -> Value {
        let mut object = Map::new();
        object.insert(
            DATE_RELEASED_COLUMN.to_string(),
            serde_json::to_value(&self.date_released).unwrap_or(Value::Null),
        );
        object.insert(
            GENRES_COLUMN.to_string(),
            serde_json::to_value(&self.genres).unwrap_or(Value::Null),
        );
        object.insert(
            TEMPO_COLUMN.to_string(),
            serde_json::to_value(&self.tempo).unwrap_or(Value::Null),
        );
        for (name, values) in &self.metrics {
            object.insert(
                name.clone(),
                serde_json::to_value(values).unwrap_or(Value::Null),
            );
        }
        if include_status {
            object.insert(
                STATUS_COLUMN.to_string(),
                serde_json::to_value(&self.status).unwrap_or(Value::Null),
            );
        }
        Value::Object(object)
    }
}

/// Attributes already fetched during this run, keyed per [`CacheKeyStrategy`].
///
/// Grows monotonically; nothing is ever evicted during a run.
pub struct EnrichmentCache {
    strategy: CacheKeyStrategy,
    entries: HashMap<CacheKey, Arc<SongAttributes>>,
    columns: EnrichedColumns,
    include_status: bool,
}

impl EnrichmentCache {
    pub fn new(strategy: CacheKeyStrategy, include_status: bool) -> Self {
        Self {
            strategy,
            entries: HashMap::new(),
            columns: EnrichedColumns::new(),
            include_status,
        }
    }

    pub fn strategy(&self) -> CacheKeyStrategy {
        self.strategy
    }

    pub fn get(&self, title: &str, artist: &str) -> Option<Arc<SongAttributes>> {
        self.entries
            .get(&self.strategy.key(title, artist))
            .cloned()
    }

    pub fn put(&mut self, title: &str, artist: &str, attributes: SongAttributes) -> Arc<SongAttributes> {
        let attributes = Arc::new(attributes);
        self.entries
            .insert(self.strategy.key(title, artist), Arc::clone(&attributes));
        attributes
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry and recorded row.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.columns = EnrichedColumns::new();
    }

    /// Append a processed row to the column accumulation.
    pub fn record(&mut self, result: &EnrichmentResult, status: RowStatus) {
        self.columns.push(result, status);
    }

    pub fn columns(&self) -> &EnrichedColumns {
        &self.columns
    }

    pub fn include_status(&self) -> bool {
        self.include_status
    }

    /// Write the column accumulation to `path` as JSON.
    ///
    /// Writes a sibling temporary file first and renames it over `path`.
    pub fn persist(&self, path: &Path) -> Result<(), CacheError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.columns.to_json(self.include_status))?;
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, path)?;
        info!(
            "Persisted {} rows ({} cached songs) to {:?}",
            self.columns.len(),
            self.entries.len(),
            path
        );
        Ok(())
    }
}
