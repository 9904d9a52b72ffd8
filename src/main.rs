use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use song_enricher::config::{AppConfig, CliConfig, FileConfig};
use song_enricher::enrichment::{run_with_session, CacheKeyStrategy, EnrichmentRun};
use song_enricher::{ChromiumDriver, Dataset};

mod cli_style;
use cli_style::get_styles;

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

/// Add release year, genres, tempo and audio metrics to a songs CSV.
#[derive(Parser, Debug)]
#[command(styles=get_styles())]
struct CliArgs {
    /// Cleaned input dataset (needs `Title` and `Artist` columns).
    #[clap(value_parser = parse_path)]
    pub input: Option<PathBuf>,

    /// Where to write the enriched dataset.
    #[clap(value_parser = parse_path)]
    pub output: Option<PathBuf>,

    /// Where to persist the enriched columns as JSON.
    #[clap(long, value_parser = parse_path)]
    pub cache_file: Option<PathBuf>,

    /// Path to TOML config file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Lookup site URL.
    #[clap(long)]
    pub base_url: Option<String>,

    /// Launch a visible browser window.
    #[clap(long)]
    pub show_browser: bool,

    /// What identifies a song in the per-run cache.
    #[clap(long, value_enum)]
    pub cache_key: Option<CacheKeyStrategy>,

    /// Append an `Enrichment Status` column to the output.
    #[clap(long)]
    pub status_column: bool,

    /// Default log level, overridden by the LOG_LEVEL environment variable.
    #[clap(long)]
    pub log_level: Option<String>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            input_path: self.input.clone(),
            output_path: self.output.clone(),
            cache_file: self.cache_file.clone(),
            base_url: self.base_url.clone(),
            show_browser: self.show_browser,
            cache_key: self.cache_key,
            status_column: self.status_column,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(config.log_level.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let dataset = Dataset::load_csv(&config.input_path)
        .with_context(|| format!("Failed to load dataset {:?}", config.input_path))?;
    if dataset.is_empty() {
        info!("Nothing to enrich in {:?}", config.input_path);
    }

    info!(
        "Launching browser (headless: {})...",
        config.launch.headless
    );
    let driver = ChromiumDriver::launch(config.launch.clone())
        .await
        .context("Failed to start browser session")?;

    let run = run_with_session(
        driver,
        config.enricher.clone(),
        config.cache_file.clone(),
        &dataset,
    )
    .await?;

    run.dataset
        .save_csv(&config.output_path)
        .with_context(|| format!("Failed to write {:?}", config.output_path))?;

    print_report(&config, &run);

    if let Some(e) = &run.session_error {
        error!("Run ended with a lost browser session: {}", e);
        bail!("Browser session lost: {}", e);
    }
    if let Some(e) = &run.persist_error {
        bail!("Failed to write cache file {:?}: {}", config.cache_file, e);
    }
    Ok(())
}

fn print_report(config: &AppConfig, run: &EnrichmentRun) {
    cli_style::print_section_header("Enrichment");
    cli_style::print_key_value("Input", &config.input_path.display().to_string());
    cli_style::print_key_value("Output", &config.output_path.display().to_string());
    cli_style::print_key_value("Cache file", &config.cache_file.display().to_string());
    cli_style::print_key_value("Rows", &run.dataset.len().to_string());
    cli_style::print_key_value("Enriched", &run.summary.enriched.to_string());
    cli_style::print_key_value("From cache", &run.summary.cached.to_string());
    cli_style::print_key_value("Failed", &run.summary.failed.to_string());
    cli_style::print_section_footer();

    if run.is_clean() && run.summary.failed == 0 {
        cli_style::print_success("Every row was enriched");
    } else if run.is_clean() {
        cli_style::print_warning(&format!(
            "{} rows could not be enriched and were left empty",
            run.summary.failed
        ));
    } else {
        cli_style::print_error("Run did not complete cleanly, see the log");
    }
}
