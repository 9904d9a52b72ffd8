//! Browser automation seam.
//!
//! The enrichment pipeline never talks to a browser directly. It goes through
//! the [`BrowserDriver`] trait, which exposes the handful of primitives the
//! lookup site needs: navigate, reload, type into an element, read attributes
//! and text. [`ChromiumDriver`] is the production implementation.

mod chromium;

pub use chromium::{ChromiumDriver, LaunchOptions};

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a browser driver.
#[derive(Debug, Error)]
pub enum DriverError {
    /// A required DOM element did not show up within the element-wait timeout.
    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("Failed to launch browser: {0}")]
    Launch(String),

    /// The session failed while executing a command.
    #[error("Browser session error: {0}")]
    Session(String),
}

impl DriverError {
    pub fn not_found(selector: &str) -> Self {
        DriverError::ElementNotFound {
            selector: selector.to_string(),
        }
    }

    /// Returns true when the error only means "nothing matched the selector".
    pub fn is_element_not_found(&self) -> bool {
        matches!(self, DriverError::ElementNotFound { .. })
    }
}

/// Primitives of a single, stateful browser session.
///
/// All methods take `&mut self`: the session is one shared resource and only
/// one command can be in flight at a time.
///
/// Single-element lookups (`type_text`, `attribute`, `inner_text`,
/// `text_content`) block up to the driver's element-wait timeout and then
/// fail with [`DriverError::ElementNotFound`]. Multi-element lookups return
/// an empty list instead.
#[async_trait]
pub trait BrowserDriver: Send {
    /// Navigate the current page to `url`.
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError>;

    /// Reload the current page.
    async fn reload(&mut self) -> Result<(), DriverError>;

    /// Tear the session down and launch a fresh one on a blank page.
    async fn restart(&mut self) -> Result<(), DriverError>;

    /// Focus the first element matching `selector` and type `text` into it.
    async fn type_text(&mut self, selector: &str, text: &str) -> Result<(), DriverError>;

    /// Read attribute `name` of the first element matching `selector`.
    async fn attribute(&mut self, selector: &str, name: &str)
        -> Result<Option<String>, DriverError>;

    /// Rendered text of the first element matching `selector`.
    async fn inner_text(&mut self, selector: &str) -> Result<String, DriverError>;

    /// Raw `textContent` of the first element matching `selector`.
    async fn text_content(&mut self, selector: &str) -> Result<String, DriverError>;

    /// Rendered text of every element matching `selector`, in document order.
    async fn all_inner_texts(&mut self, selector: &str) -> Result<Vec<String>, DriverError>;

    /// Whether an element matching `selector` is present right now, without
    /// waiting.
    async fn is_present(&mut self, selector: &str) -> Result<bool, DriverError>;

    /// Close the session. Further calls fail with [`DriverError::Session`].
    async fn close(&mut self) -> Result<(), DriverError>;
}

/// CSS selectors used on the lookup site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSelectors {
    pub search_input: String,
    pub results_dropdown: String,
    pub track_id_attribute: String,
    pub album_data: String,
    pub genre_tags: String,
    pub tempo_spans: String,
    pub metrics_container: String,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            search_input: "#search-word".to_string(),
            results_dropdown: ".span-class".to_string(),
            track_id_attribute: "data-song-id".to_string(),
            album_data: ".album-data".to_string(),
            genre_tags: "div.pl-tags.tagcloud a".to_string(),
            tempo_spans: ".tempo-duration-first span".to_string(),
            metrics_container: ".progressbars-div".to_string(),
        }
    }
}
