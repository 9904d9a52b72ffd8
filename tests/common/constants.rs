//! Shared constants for end-to-end tests
//!
//! When the scripted catalog changes, update only this file.

use song_enricher::config::DEFAULT_BASE_URL;

pub const BASE_URL: &str = DEFAULT_BASE_URL;

// ============================================================================
// Scripted catalog
// ============================================================================

pub const QUEEN_QUERY: &str = "Bohemian Rhapsody,Queen";
pub const QUEEN_TRACK_ID: &str = "4u7EnebtmKWzUH433cf5Qv";

pub const LENNON_QUERY: &str = "Imagine,John Lennon";
pub const LENNON_TRACK_ID: &str = "7pKfPomDEeI4TPT6EOYjn9";

/// Only findable by title; "Vienna,Billy Joel" has no results.
pub const VIENNA_QUERY: &str = "Vienna";
pub const VIENNA_TRACK_ID: &str = "4U45aEWtQhrm8A5mxPaFZ7";

// ============================================================================
// Input datasets
// ============================================================================

/// Four songs in the cleaned-dataset layout: one direct hit, one shared
/// title, one title-only hit and one unknown song.
pub const CLEANED_DATASET: &str = "\
Artist,Album,Title,Date
Queen,A Night at the Opera,Bohemian Rhapsody,1975
John Lennon,Imagine,Imagine,1971
A Perfect Circle,eMOTIVe,Imagine,2004
Billy Joel,The Stranger,Vienna,1977
Nobody,Nothing,Not A Real Song,2020
";

pub const CLEANED_DATASET_ROWS: usize = 5;
