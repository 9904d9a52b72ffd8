//! Song enricher library
//!
//! This library exposes the internal modules for the binaries and the
//! integration tests.

pub mod browser;
pub mod config;
pub mod dataset;
pub mod enrichment;

// Re-export commonly used types for convenience
pub use browser::{BrowserDriver, ChromiumDriver, DriverError, LaunchOptions, SiteSelectors};
pub use dataset::{Dataset, DatasetError, OutputDataset};
pub use enrichment::{run_with_session, EnrichmentPipeline, EnrichmentRun, PipelineError};
