use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub input_path: Option<String>,
    pub output_path: Option<String>,
    pub cache_file: Option<String>,
    pub base_url: Option<String>,
    pub log_level: Option<String>,
    pub cache_key: Option<String>,
    pub status_column: Option<bool>,
    pub checkpoint_every: Option<usize>,

    // Sections
    pub browser: Option<BrowserFileConfig>,
    pub pacing: Option<PacingConfig>,
    pub selectors: Option<SelectorsConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct BrowserFileConfig {
    pub headless: Option<bool>,
    pub chrome_executable: Option<String>,
    pub element_timeout_ms: Option<u64>,
    pub element_poll_interval_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct PacingConfig {
    pub open_pause_ms: Option<u64>,
    pub reload_pause_ms: Option<u64>,
    /// "fixed" or "poll"
    pub navigation_wait: Option<String>,
    pub navigation_pause_ms: Option<u64>,
    pub navigation_poll_timeout_ms: Option<u64>,
    pub navigation_poll_interval_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct SelectorsConfig {
    pub search_input: Option<String>,
    pub results_dropdown: Option<String>,
    pub track_id_attribute: Option<String>,
    pub album_data: Option<String>,
    pub genre_tags: Option<String>,
    pub tempo_spans: Option<String>,
    pub metrics_container: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
