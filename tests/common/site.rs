//! A scripted stand-in for the lookup site.

use super::constants::*;
use async_trait::async_trait;
use song_enricher::{BrowserDriver, DriverError, SiteSelectors};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// What a detail page shows.
#[derive(Debug, Clone)]
pub struct SitePage {
    pub album_data: String,
    pub tags: Vec<String>,
    pub tempo: String,
    pub metrics: String,
}

impl SitePage {
    pub fn new(album_data: &str, tags: &[&str], tempo: &str, metrics: &str) -> Self {
        Self {
            album_data: album_data.to_string(),
            tags: tags.iter().map(|s| s.to_string()).collect(),
            tempo: tempo.to_string(),
            metrics: metrics.to_string(),
        }
    }
}

/// Answers driver calls from a fixed catalog and logs every command to a
/// shared journal, so tests can inspect it after the pipeline consumed the
/// driver.
pub struct ScriptedSite {
    selectors: SiteSelectors,
    results: HashMap<String, String>,
    pages: HashMap<String, SitePage>,
    journal: Arc<Mutex<Vec<String>>>,
    dropdown: Option<String>,
    current: Option<SitePage>,
    closed: bool,
    unreachable: bool,
}

impl ScriptedSite {
    pub fn new() -> Self {
        Self {
            selectors: SiteSelectors::default(),
            results: HashMap::new(),
            pages: HashMap::new(),
            journal: Arc::new(Mutex::new(Vec::new())),
            dropdown: None,
            current: None,
            closed: false,
            unreachable: false,
        }
    }

    /// A site whose every navigation fails, so the session never opens.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::new()
        }
    }

    /// The catalog described in `constants`.
    pub fn with_catalog() -> Self {
        Self::new()
            .with_song(
                QUEEN_QUERY,
                QUEEN_TRACK_ID,
                SitePage::new(
                    "A Night at the Opera\n1975",
                    &["rock", "glam rock", "rock"],
                    "Tempo 72 BPM",
                    "Popularity: 88% Happiness: 23% Energy: 40%",
                ),
            )
            .with_song(
                LENNON_QUERY,
                LENNON_TRACK_ID,
                SitePage::new(
                    "Imagine 1971",
                    &["soft rock", "rock"],
                    "Tempo 75",
                    "Popularity: 80% Acousticness: 90%",
                ),
            )
            .with_song(
                VIENNA_QUERY,
                VIENNA_TRACK_ID,
                SitePage::new(
                    "The Stranger 1977",
                    &["piano rock"],
                    "Tempo 80",
                    "Popularity: 70% Liveness: 10%",
                ),
            )
    }

    pub fn with_song(mut self, query: &str, track_id: &str, page: SitePage) -> Self {
        self.results.insert(query.to_string(), track_id.to_string());
        self.pages.insert(track_id.to_string(), page);
        self
    }

    pub fn journal(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.journal)
    }

    fn log(&self, entry: String) {
        self.journal.lock().expect("journal poisoned").push(entry);
    }

    fn ensure_open(&self) -> Result<(), DriverError> {
        if self.closed {
            return Err(DriverError::Session("session closed".to_string()));
        }
        Ok(())
    }

    fn page(&self, selector: &str) -> Result<&SitePage, DriverError> {
        self.current
            .as_ref()
            .ok_or_else(|| DriverError::not_found(selector))
    }
}

#[async_trait]
impl BrowserDriver for ScriptedSite {
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.ensure_open()?;
        self.log(format!("navigate {}", url));
        if self.unreachable {
            return Err(DriverError::Session(format!("{} is unreachable", url)));
        }
        self.dropdown = None;
        self.current = url
            .strip_prefix(BASE_URL)
            .and_then(|rest| rest.strip_prefix("?track="))
            .and_then(|id| self.pages.get(id).cloned());
        Ok(())
    }

    async fn reload(&mut self) -> Result<(), DriverError> {
        self.ensure_open()?;
        self.log("reload".to_string());
        self.dropdown = None;
        Ok(())
    }

    async fn restart(&mut self) -> Result<(), DriverError> {
        self.log("restart".to_string());
        self.closed = false;
        self.dropdown = None;
        self.current = None;
        Ok(())
    }

    async fn type_text(&mut self, selector: &str, text: &str) -> Result<(), DriverError> {
        self.ensure_open()?;
        if selector != self.selectors.search_input {
            return Err(DriverError::not_found(selector));
        }
        self.log(format!("search {}", text));
        self.dropdown = self.results.get(text).cloned();
        Ok(())
    }

    async fn attribute(&mut self, selector: &str, name: &str) -> Result<Option<String>, DriverError> {
        self.ensure_open()?;
        if selector != self.selectors.results_dropdown || name != self.selectors.track_id_attribute {
            return Err(DriverError::not_found(selector));
        }
        self.dropdown
            .clone()
            .map(Some)
            .ok_or_else(|| DriverError::not_found(selector))
    }

    async fn inner_text(&mut self, selector: &str) -> Result<String, DriverError> {
        self.ensure_open()?;
        let page = self.page(selector)?;
        if selector == self.selectors.album_data {
            Ok(page.album_data.clone())
        } else {
            Err(DriverError::not_found(selector))
        }
    }

    async fn text_content(&mut self, selector: &str) -> Result<String, DriverError> {
        self.ensure_open()?;
        let page = self.page(selector)?;
        if selector == self.selectors.metrics_container {
            Ok(page.metrics.clone())
        } else {
            Err(DriverError::not_found(selector))
        }
    }

    async fn all_inner_texts(&mut self, selector: &str) -> Result<Vec<String>, DriverError> {
        self.ensure_open()?;
        let Some(page) = self.current.as_ref() else {
            return Ok(Vec::new());
        };
        if selector == self.selectors.genre_tags {
            Ok(page.tags.clone())
        } else if selector == self.selectors.tempo_spans {
            Ok(vec!["3:25".to_string(), page.tempo.clone()])
        } else {
            Ok(Vec::new())
        }
    }

    async fn is_present(&mut self, selector: &str) -> Result<bool, DriverError> {
        self.ensure_open()?;
        Ok(self.current.is_some() && selector == self.selectors.metrics_container)
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        self.log("close".to_string());
        self.closed = true;
        Ok(())
    }
}
