use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use song_enricher::dataset::cleaner::{self, CLEAN_HEADERS};

mod cli_style;
use cli_style::get_styles;

/// Put column names on the raw songs export so the enricher can read it.
#[derive(Parser, Debug)]
#[command(styles=get_styles())]
struct CliArgs {
    /// Raw export to clean.
    #[clap(default_value = "./data/raw_dataset.csv")]
    pub raw: PathBuf,

    /// Where to write the cleaned dataset.
    #[clap(default_value = "./data/cleaned_dataset.csv")]
    pub clean: PathBuf,

    /// Column names to apply, in file order.
    #[clap(long, value_delimiter = ',', default_values_t = CLEAN_HEADERS.map(String::from))]
    pub headers: Vec<String>,

    /// Treat the raw file's first line as data instead of replacing it.
    #[clap(long)]
    pub keep_first_row: bool,

    /// Print the distinct values found in each column.
    #[clap(long)]
    pub summary: bool,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let table = match cleaner::clean(
        &cli_args.raw,
        &cli_args.clean,
        &cli_args.headers,
        !cli_args.keep_first_row,
    ) {
        Ok(table) => table,
        Err(e) => {
            cli_style::print_error(&format!("Cleaning {:?} failed: {}", cli_args.raw, e));
            return Err(e).with_context(|| format!("Failed to clean {:?}", cli_args.raw));
        }
    };

    cli_style::print_success(&format!(
        "Wrote {} rows to {}",
        table.records.len(),
        cli_args.clean.display()
    ));

    if cli_args.summary {
        for column in cleaner::summarize(&table) {
            cli_style::print_section_header(&column.name);
            cli_style::print_key_value("Distinct values", &column.distinct.len().to_string());
            if column.distinct.is_empty() {
                cli_style::print_warning("No values");
            }
            for value in &column.distinct {
                cli_style::print_list_item(value, 1);
            }
            cli_style::print_section_footer();
        }
    }

    Ok(())
}
