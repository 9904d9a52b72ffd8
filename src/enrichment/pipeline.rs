//! Batch enrichment of a dataset.
//!
//! Rows are processed strictly in input order on a single browser session.
//! A row that cannot be enriched gets nulls in every enriched column and the
//! batch moves on; the output always has exactly one row per input row.

use super::cache::EnrichmentCache;
use super::models::{EnrichmentResult, RowStatus, RunSummary};
use super::resolver::SearchResolver;
use crate::browser::{BrowserDriver, DriverError};
use crate::config::EnricherSettings;
use crate::dataset::{Dataset, DatasetError, OutputDataset, Row};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to open the lookup site: {0}")]
    Start(#[source] DriverError),

    #[error("Failed to assemble output: {0}")]
    Output(#[from] DatasetError),
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct EnrichmentRun {
    pub dataset: OutputDataset,
    pub summary: RunSummary,
    /// Set when the browser could be neither reloaded nor restarted. Rows
    /// after that point that were not cached are recorded as failed.
    pub session_error: Option<String>,
    /// Set when the final write of the cache side file failed.
    pub persist_error: Option<String>,
}

impl EnrichmentRun {
    pub fn is_clean(&self) -> bool {
        self.session_error.is_none() && self.persist_error.is_none()
    }
}

pub struct EnrichmentPipeline<D: BrowserDriver> {
    driver: D,
    resolver: SearchResolver,
    cache: EnrichmentCache,
    settings: EnricherSettings,
    cache_file: PathBuf,
    summary: RunSummary,
    session_error: Option<DriverError>,
}

impl<D: BrowserDriver> EnrichmentPipeline<D> {
    pub fn new(driver: D, settings: EnricherSettings, cache_file: PathBuf) -> Self {
        Self {
            driver,
            resolver: SearchResolver::new(settings.clone()),
            cache: EnrichmentCache::new(settings.cache_key, settings.status_column),
            settings,
            cache_file,
            summary: RunSummary::default(),
            session_error: None,
        }
    }

    pub fn cache(&self) -> &EnrichmentCache {
        &self.cache
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Open the lookup site and wait for it to render.
    pub async fn start(&mut self) -> Result<(), PipelineError> {
        self.resolver
            .open(&mut self.driver)
            .await
            .map_err(PipelineError::Start)
    }

    /// Enrich every row of `dataset`, persist the side file and assemble the
    /// output.
    ///
    /// Each call is a fresh run: the cache, its recorded rows and the summary
    /// start empty.
    pub async fn run(&mut self, dataset: &Dataset) -> Result<EnrichmentRun, PipelineError> {
        self.cache.reset();
        self.summary = RunSummary::default();
        let total = dataset.len();
        info!(
            "Enriching {} rows (cache keyed by {:?})",
            total,
            self.cache.strategy()
        );

        for (index, row) in dataset.rows().iter().enumerate() {
            let (result, status) = self.enrich_row(row).await;
            match &result {
                EnrichmentResult::Success(_) => info!(
                    "[{}/{}] {:?} by {:?}: {}",
                    index + 1,
                    total,
                    row.title(),
                    row.artist(),
                    status.as_str()
                ),
                EnrichmentResult::Failure(reason) => warn!(
                    "[{}/{}] {:?} by {:?} failed: {}",
                    index + 1,
                    total,
                    row.title(),
                    row.artist(),
                    reason
                ),
            }

            self.cache.record(&result, status);
            self.summary.record(status);

            if status == RowStatus::Failed && self.session_error.is_none() {
                if let Err(e) = self.recover_session().await {
                    error!("Browser session is unusable: {}", e);
                    self.session_error = Some(e);
                }
            }

            self.checkpoint(index + 1, total);
        }

        let persist_error = match self.cache.persist(&self.cache_file) {
            Ok(()) => None,
            Err(e) => {
                error!("Failed to persist cache to {:?}: {}", self.cache_file, e);
                Some(e.to_string())
            }
        };

        let columns = self.cache.columns();
        let include_status = self.cache.include_status();
        let enriched_rows = (0..columns.len())
            .map(|i| columns.row(i, include_status))
            .collect();
        let output =
            OutputDataset::assemble(dataset, columns.headers(include_status), enriched_rows)?;

        info!(
            "Enrichment finished: {} enriched, {} from cache, {} failed",
            self.summary.enriched, self.summary.cached, self.summary.failed
        );

        Ok(EnrichmentRun {
            dataset: output,
            summary: self.summary,
            session_error: self.session_error.as_ref().map(|e| e.to_string()),
            persist_error,
        })
    }

    async fn enrich_row(&mut self, row: &Row) -> (EnrichmentResult, RowStatus) {
        if let Some(attributes) = self.cache.get(row.title(), row.artist()) {
            debug!("Cache hit for {:?}", row.title());
            return (EnrichmentResult::Success(attributes), RowStatus::Cached);
        }

        if let Some(e) = &self.session_error {
            return (
                EnrichmentResult::Failure(format!("browser session lost: {}", e)),
                RowStatus::Failed,
            );
        }

        match self
            .resolver
            .fetch_attributes(&mut self.driver, row.title(), row.artist())
            .await
        {
            Ok(attributes) => {
                let attributes = self.cache.put(row.title(), row.artist(), attributes);
                (EnrichmentResult::Success(attributes), RowStatus::Enriched)
            }
            Err(e) => (EnrichmentResult::Failure(e.to_string()), RowStatus::Failed),
        }
    }

    /// Reload the page; if that fails, restart the browser and reopen the site.
    async fn recover_session(&mut self) -> Result<(), DriverError> {
        match self.resolver.reload(&mut self.driver).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("Reload failed ({}), restarting browser session", e);
                self.driver.restart().await?;
                self.resolver.open(&mut self.driver).await
            }
        }
    }

    fn checkpoint(&self, processed: usize, total: usize) {
        if !checkpoint_due(processed, total, self.settings.checkpoint_every) {
            return;
        }
        match self.cache.persist(&self.cache_file) {
            Ok(()) => debug!("Checkpoint after {} rows", processed),
            Err(e) => warn!("Checkpoint after {} rows failed: {}", processed, e),
        }
    }

    /// Close the browser session and hand the driver back.
    pub async fn close(mut self) -> D {
        if let Err(e) = self.driver.close().await {
            warn!("Failed to close browser session: {}", e);
        }
        self.driver
    }
}

/// The last row is covered by the final persist, not by a checkpoint.
fn checkpoint_due(processed: usize, total: usize, every: usize) -> bool {
    every != 0 && processed % every == 0 && processed < total
}

/// Open a session on `driver`, run the whole dataset and close the session on
/// every exit path.
pub async fn run_with_session<D: BrowserDriver>(
    driver: D,
    settings: EnricherSettings,
    cache_file: PathBuf,
    dataset: &Dataset,
) -> Result<EnrichmentRun, PipelineError> {
    let mut pipeline = EnrichmentPipeline::new(driver, settings, cache_file);
    let result = match pipeline.start().await {
        Ok(()) => pipeline.run(dataset).await,
        Err(e) => Err(e),
    };
    pipeline.close().await;
    result
}
