use crate::browser::DriverError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use thiserror::Error;

pub const DATE_RELEASED_COLUMN: &str = "Date Released";
pub const GENRES_COLUMN: &str = "Genres";
pub const TEMPO_COLUMN: &str = "Tempo";
pub const STATUS_COLUMN: &str = "Enrichment Status";

/// Metric categories that always get an output column, even when the page
/// does not report them.
pub const WELL_KNOWN_METRICS: [&str; 9] = [
    "Popularity",
    "Happiness",
    "Danceability",
    "Energy",
    "Acousticness",
    "Instrumentalness",
    "Liveness",
    "Speechiness",
    "Loudness",
];

/// Attributes scraped for one song.
///
/// Immutable once built; shared between rows through `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongAttributes {
    date_released: Option<String>,
    genres: BTreeSet<String>,
    tempo: u32,
    metrics: BTreeMap<String, String>,
}

impl SongAttributes {
    pub fn new(
        date_released: Option<String>,
        genres: BTreeSet<String>,
        tempo: u32,
        metrics: BTreeMap<String, String>,
    ) -> Self {
        Self {
            date_released,
            genres,
            tempo,
            metrics,
        }
    }

    pub fn date_released(&self) -> Option<&str> {
        self.date_released.as_deref()
    }

    pub fn genres(&self) -> &BTreeSet<String> {
        &self.genres
    }

    /// Genre labels joined with commas, as written to the output dataset.
    pub fn genres_joined(&self) -> String {
        self.genres
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn tempo(&self) -> u32 {
        self.tempo
    }

    pub fn metrics(&self) -> &BTreeMap<String, String> {
        &self.metrics
    }

    pub fn metric(&self, category: &str) -> Option<&str> {
        self.metrics.get(category).map(String::as_str)
    }
}

/// Errors produced while turning page text into [`SongAttributes`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Malformed page: {0}")]
    MalformedPage(String),

    #[error("Tempo text is not '<label> <number>': {0:?}")]
    Tempo(String),
}

/// Why attributes could not be fetched for a song.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("No search result for {title:?} (with and without artist)")]
    NotFound { title: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Outcome of enriching one row.
#[derive(Debug, Clone)]
pub enum EnrichmentResult {
    Success(Arc<SongAttributes>),
    Failure(String),
}

impl EnrichmentResult {
    pub fn attributes(&self) -> Option<&SongAttributes> {
        match self {
            EnrichmentResult::Success(attributes) => Some(attributes),
            EnrichmentResult::Failure(_) => None,
        }
    }
}

/// How a row's attributes were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Enriched,
    Cached,
    Failed,
}

impl RowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowStatus::Enriched => "enriched",
            RowStatus::Cached => "cached",
            RowStatus::Failed => "failed",
        }
    }
}

/// Per-run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub enriched: usize,
    pub cached: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn record(&mut self, status: RowStatus) {
        match status {
            RowStatus::Enriched => self.enriched += 1,
            RowStatus::Cached => self.cached += 1,
            RowStatus::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.enriched + self.cached + self.failed
    }
}
