//! Common test infrastructure
//!
//! This module provides everything end-to-end tests need to drive the
//! enrichment pipeline without a real browser.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{ScriptedSite, TestWorkspace, QUEEN_TRACK_ID};
//!
//! #[tokio::test]
//! async fn test_enrich_one_song() {
//!     let workspace = TestWorkspace::with_input("Title,Artist\nBohemian Rhapsody,Queen\n");
//!     let site = ScriptedSite::with_catalog();
//!     // ...
//! }
//! ```

mod constants;
mod site;
mod workspace;

// Public API - this is what tests import
pub use constants::*;
pub use site::{ScriptedSite, SitePage};
pub use workspace::TestWorkspace;
