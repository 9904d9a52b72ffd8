mod cache;
mod models;
pub mod parser;
mod pipeline;
mod resolver;
mod wait;

pub use cache::{CacheError, CacheKey, CacheKeyStrategy, EnrichedColumns, EnrichmentCache};
pub use models::{
    EnrichmentResult, FetchError, ParseError, RowStatus, RunSummary, SongAttributes,
    DATE_RELEASED_COLUMN, GENRES_COLUMN, STATUS_COLUMN, TEMPO_COLUMN, WELL_KNOWN_METRICS,
};
pub use pipeline::{run_with_session, EnrichmentPipeline, EnrichmentRun, PipelineError};
pub use resolver::{search_query, SearchMode, SearchOutcome, SearchResolver};
pub use wait::WaitStrategy;
