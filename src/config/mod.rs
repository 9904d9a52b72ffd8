mod file_config;

pub use file_config::{BrowserFileConfig, FileConfig, PacingConfig, SelectorsConfig};

use crate::browser::{LaunchOptions, SiteSelectors};
use crate::enrichment::{CacheKeyStrategy, WaitStrategy};
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

pub const DEFAULT_BASE_URL: &str = "https://www.chosic.com/music-genre-finder/";
pub const DEFAULT_INPUT_PATH: &str = "./data/cleaned_dataset.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "./data/complete_dataset.csv";
pub const DEFAULT_CACHE_FILE: &str = "./data/enrichment_cache.json";

const DEFAULT_PAUSE: Duration = Duration::from_secs(2);

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub cache_file: Option<PathBuf>,
    pub base_url: Option<String>,
    pub show_browser: bool,
    pub cache_key: Option<CacheKeyStrategy>,
    pub status_column: bool,
    pub log_level: Option<String>,
}

/// Everything the enrichment pipeline needs, passed explicitly at construction.
#[derive(Debug, Clone)]
pub struct EnricherSettings {
    pub base_url: String,
    pub selectors: SiteSelectors,
    /// Pause after opening the site on a fresh session.
    pub open_pause: Duration,
    /// Pause after every page reload.
    pub reload_pause: Duration,
    /// Wait applied after navigating to a detail page, before reading it.
    pub navigation_wait: WaitStrategy,
    pub cache_key: CacheKeyStrategy,
    /// Persist the cache side file every N processed rows; 0 disables.
    pub checkpoint_every: usize,
    pub status_column: bool,
}

impl Default for EnricherSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            selectors: SiteSelectors::default(),
            open_pause: DEFAULT_PAUSE,
            reload_pause: DEFAULT_PAUSE,
            navigation_wait: WaitStrategy::FixedDelay(DEFAULT_PAUSE),
            cache_key: CacheKeyStrategy::default(),
            checkpoint_every: 25,
            status_column: false,
        }
    }
}

impl EnricherSettings {
    /// Defaults with every pause set to zero, for drivers that render
    /// synchronously.
    pub fn immediate() -> Self {
        Self {
            open_pause: Duration::ZERO,
            reload_pause: Duration::ZERO,
            navigation_wait: WaitStrategy::FixedDelay(Duration::ZERO),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub cache_file: PathBuf,
    pub log_level: LevelFilter,
    pub launch: LaunchOptions,
    pub enricher: EnricherSettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let input_path = file
            .input_path
            .map(PathBuf::from)
            .or_else(|| cli.input_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_PATH));
        let output_path = file
            .output_path
            .map(PathBuf::from)
            .or_else(|| cli.output_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));
        let cache_file = file
            .cache_file
            .map(PathBuf::from)
            .or_else(|| cli.cache_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_FILE));

        if input_path == output_path {
            bail!("Output path must differ from input path: {:?}", input_path);
        }

        let log_level = match file.log_level.as_deref().or(cli.log_level.as_deref()) {
            Some(level) => LevelFilter::from_str(level)
                .map_err(|_| anyhow::anyhow!("Invalid log level: {}", level))?,
            None => LevelFilter::INFO,
        };

        let base_url = file
            .base_url
            .or_else(|| cli.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            bail!("base_url must be an http(s) URL, got {:?}", base_url);
        }

        let cache_key = match file.cache_key.as_deref() {
            Some(value) => <CacheKeyStrategy as ValueEnum>::from_str(value, true)
                .map_err(|e| anyhow::anyhow!("Invalid cache_key {:?}: {}", value, e))?,
            None => cli.cache_key.unwrap_or_default(),
        };

        // Browser settings - merge file config with defaults
        let browser = file.browser.unwrap_or_default();
        let default_launch = LaunchOptions::default();
        let launch = LaunchOptions {
            headless: browser
                .headless
                .unwrap_or(default_launch.headless && !cli.show_browser),
            chrome_executable: browser.chrome_executable.map(PathBuf::from),
            element_timeout: browser
                .element_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(default_launch.element_timeout),
            poll_interval: browser
                .element_poll_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(default_launch.poll_interval),
        };

        let pacing = file.pacing.unwrap_or_default();
        let selectors = resolve_selectors(file.selectors.unwrap_or_default());
        let navigation_wait = resolve_navigation_wait(&pacing, &selectors)?;

        let enricher = EnricherSettings {
            base_url,
            open_pause: millis_or_default(pacing.open_pause_ms),
            reload_pause: millis_or_default(pacing.reload_pause_ms),
            navigation_wait,
            selectors,
            cache_key,
            checkpoint_every: file.checkpoint_every.unwrap_or(25),
            status_column: file.status_column.unwrap_or(cli.status_column),
        };

        Ok(Self {
            input_path,
            output_path,
            cache_file,
            log_level,
            launch,
            enricher,
        })
    }
}

fn millis_or_default(ms: Option<u64>) -> Duration {
    ms.map(Duration::from_millis).unwrap_or(DEFAULT_PAUSE)
}

fn resolve_selectors(file: SelectorsConfig) -> SiteSelectors {
    let defaults = SiteSelectors::default();
    SiteSelectors {
        search_input: file.search_input.unwrap_or(defaults.search_input),
        results_dropdown: file.results_dropdown.unwrap_or(defaults.results_dropdown),
        track_id_attribute: file
            .track_id_attribute
            .unwrap_or(defaults.track_id_attribute),
        album_data: file.album_data.unwrap_or(defaults.album_data),
        genre_tags: file.genre_tags.unwrap_or(defaults.genre_tags),
        tempo_spans: file.tempo_spans.unwrap_or(defaults.tempo_spans),
        metrics_container: file
            .metrics_container
            .unwrap_or(defaults.metrics_container),
    }
}

fn resolve_navigation_wait(pacing: &PacingConfig, selectors: &SiteSelectors) -> Result<WaitStrategy> {
    match pacing.navigation_wait.as_deref() {
        None | Some("fixed") => Ok(WaitStrategy::FixedDelay(millis_or_default(
            pacing.navigation_pause_ms,
        ))),
        Some("poll") => Ok(WaitStrategy::UntilPresent {
            selector: selectors.metrics_container.clone(),
            timeout: pacing
                .navigation_poll_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(Duration::from_secs(10)),
            interval: pacing
                .navigation_poll_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(Duration::from_millis(250)),
        }),
        Some(other) => bail!("Unknown navigation_wait {:?}, expected \"fixed\" or \"poll\"", other),
    }
}
