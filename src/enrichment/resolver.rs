//! Search-and-navigate against the lookup site.
//!
//! ```text
//! TRY_WITH_ARTIST --found--> NAVIGATE --> SUCCESS
//!        | not found: reload
//!        v
//! TRY_TITLE_ONLY  --found--> NAVIGATE --> SUCCESS
//!        | not found: reload
//!        v
//!       FAIL
//! ```
//!
//! Every lookup starts over in `TRY_WITH_ARTIST`, so a failure on one song
//! never changes how the next one is searched.

use super::models::{FetchError, ParseError, SongAttributes};
use super::parser;
use super::wait::pause;
use crate::browser::{BrowserDriver, DriverError};
use crate::config::EnricherSettings;
use tracing::{debug, info, warn};

/// Result of a single search attempt.
#[derive(Debug)]
pub enum SearchOutcome {
    /// The dropdown showed a result and the browser is now on its detail page.
    Found(String),
    NotFound,
    Error(DriverError),
}

/// Query shape for one search attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    WithArtist,
    TitleOnly,
}

impl SearchMode {
    /// Attempt order for a single lookup.
    pub const FALLBACK_ORDER: [SearchMode; 2] = [SearchMode::WithArtist, SearchMode::TitleOnly];

    pub fn appends_artist(&self) -> bool {
        matches!(self, SearchMode::WithArtist)
    }
}

pub fn search_query(title: &str, artist: &str, append_artist: bool) -> String {
    if append_artist {
        format!("{},{}", title, artist)
    } else {
        title.to_string()
    }
}

pub struct SearchResolver {
    settings: EnricherSettings,
    last_attempt_mode: Option<SearchMode>,
}

impl SearchResolver {
    pub fn new(settings: EnricherSettings) -> Self {
        Self {
            settings,
            last_attempt_mode: None,
        }
    }

    /// Mode used by the most recent search attempt.
    pub fn last_attempt_mode(&self) -> Option<SearchMode> {
        self.last_attempt_mode
    }

    pub fn detail_url(&self, track_id: &str) -> String {
        format!("{}?track={}", self.settings.base_url, track_id)
    }

    /// Type the query, read the dropdown and navigate to the hit.
    pub async fn search(
        &mut self,
        driver: &mut dyn BrowserDriver,
        title: &str,
        artist: &str,
        append_artist: bool,
    ) -> SearchOutcome {
        let selectors = &self.settings.selectors;
        let query = search_query(title, artist, append_artist);

        if let Err(e) = driver.type_text(&selectors.search_input, &query).await {
            return not_found_or_error(e);
        }
        debug!("Typed {:?} into the search box", query);

        let track_id = match driver
            .attribute(&selectors.results_dropdown, &selectors.track_id_attribute)
            .await
        {
            Ok(Some(id)) if !id.trim().is_empty() => id.trim().to_string(),
            Ok(_) => {
                debug!("Dropdown for {:?} has no track id", query);
                return SearchOutcome::NotFound;
            }
            Err(e) => return not_found_or_error(e),
        };

        debug!("Track id for {:?} is {}", query, track_id);
        match driver.navigate(&self.detail_url(&track_id)).await {
            Ok(()) => SearchOutcome::Found(track_id),
            Err(e) => SearchOutcome::Error(e),
        }
    }

    /// Run the fallback sequence and leave the browser on the detail page.
    pub async fn resolve(
        &mut self,
        driver: &mut dyn BrowserDriver,
        title: &str,
        artist: &str,
    ) -> Result<String, FetchError> {
        for mode in SearchMode::FALLBACK_ORDER {
            self.last_attempt_mode = Some(mode);
            match self
                .search(driver, title, artist, mode.appends_artist())
                .await
            {
                SearchOutcome::Found(track_id) => {
                    self.settings.navigation_wait.wait(driver).await?;
                    return Ok(track_id);
                }
                SearchOutcome::NotFound => {
                    info!("{:?} not found searching {:?}, reloading", title, mode);
                    self.reload(driver).await?;
                }
                SearchOutcome::Error(e) => return Err(e.into()),
            }
        }
        Err(FetchError::NotFound {
            title: title.to_string(),
        })
    }

    /// Resolve the song and read its attributes off the detail page.
    pub async fn fetch_attributes(
        &mut self,
        driver: &mut dyn BrowserDriver,
        title: &str,
        artist: &str,
    ) -> Result<SongAttributes, FetchError> {
        let track_id = self.resolve(driver, title, artist).await?;
        let selectors = &self.settings.selectors;

        let year_text = match driver.inner_text(&selectors.album_data).await {
            Ok(text) => Some(text),
            Err(e) if e.is_element_not_found() => {
                warn!("No album data for track {}", track_id);
                None
            }
            Err(e) => return Err(e.into()),
        };

        let genre_tags = driver.all_inner_texts(&selectors.genre_tags).await?;

        let tempo_spans = driver.all_inner_texts(&selectors.tempo_spans).await?;
        let tempo_text = tempo_spans.get(1).ok_or_else(|| {
            ParseError::MalformedPage(format!(
                "expected two tempo spans, found {}",
                tempo_spans.len()
            ))
        })?;

        let metrics_text = driver.text_content(&selectors.metrics_container).await?;

        let attributes = parser::parse(
            year_text.as_deref(),
            &genre_tags,
            tempo_text,
            &metrics_text,
        )?;
        debug!("Track {} -> {:?}", track_id, attributes);
        Ok(attributes)
    }

    /// Reload the page and give it time to settle.
    pub async fn reload(&self, driver: &mut dyn BrowserDriver) -> Result<(), DriverError> {
        driver.reload().await?;
        pause(self.settings.reload_pause).await;
        Ok(())
    }

    /// Open the lookup site on a fresh session.
    pub async fn open(&self, driver: &mut dyn BrowserDriver) -> Result<(), DriverError> {
        driver.navigate(&self.settings.base_url).await?;
        info!("Opened {}", self.settings.base_url);
        pause(self.settings.open_pause).await;
        Ok(())
    }
}

fn not_found_or_error(e: DriverError) -> SearchOutcome {
    if e.is_element_not_found() {
        SearchOutcome::NotFound
    } else {
        SearchOutcome::Error(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::testing::{FakeDriver, FakePage};

    fn resolver() -> SearchResolver {
        SearchResolver::new(EnricherSettings::immediate())
    }

    fn queen_page() -> FakePage {
        FakePage::new(
            "A Night at the Opera 1975",
            &["rock", "glam rock", "rock"],
            "Tempo 72",
            "Popularity: 88% Energy: 40%",
        )
    }

    #[test]
    fn test_search_query_shapes() {
        assert_eq!(search_query("Vienna", "Billy Joel", true), "Vienna,Billy Joel");
        assert_eq!(search_query("Vienna", "Billy Joel", false), "Vienna");
    }

    #[tokio::test]
    async fn test_search_found_navigates_to_detail_page() {
        let mut driver = FakeDriver::new().with_result(
            "Bohemian Rhapsody,Queen",
            "4u7EnebtmKWzUH433cf5Qv",
            queen_page(),
        );
        let mut resolver = resolver();

        let outcome = resolver
            .search(&mut driver, "Bohemian Rhapsody", "Queen", true)
            .await;

        assert!(matches!(outcome, SearchOutcome::Found(ref id) if id == "4u7EnebtmKWzUH433cf5Qv"));
        assert_eq!(
            driver.commands.last().map(String::as_str),
            Some("navigate https://www.chosic.com/music-genre-finder/?track=4u7EnebtmKWzUH433cf5Qv")
        );
    }

    #[tokio::test]
    async fn test_search_missing_dropdown_is_not_found() {
        let mut driver = FakeDriver::new();
        let mut resolver = resolver();

        let outcome = resolver.search(&mut driver, "Nothing", "Nobody", true).await;

        assert!(matches!(outcome, SearchOutcome::NotFound));
        assert!(!driver.commands.iter().any(|c| c.starts_with("navigate")));
    }

    #[tokio::test]
    async fn test_resolve_with_artist_succeeds_first_try() {
        let mut driver =
            FakeDriver::new().with_result("Bohemian Rhapsody,Queen", "bh", queen_page());
        let mut resolver = resolver();

        let id = resolver
            .resolve(&mut driver, "Bohemian Rhapsody", "Queen")
            .await
            .unwrap();

        assert_eq!(id, "bh");
        assert_eq!(driver.typed_queries, vec!["Bohemian Rhapsody,Queen"]);
        assert_eq!(resolver.last_attempt_mode(), Some(SearchMode::WithArtist));
        assert!(!driver.commands.contains(&"reload".to_string()));
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_title_only_then_resets() {
        let mut driver = FakeDriver::new()
            .with_result("Vienna", "vienna", FakePage::new("1977", &[], "Tempo 80", ""))
            .with_result(
                "Beyond the Sea,Bobby Darin",
                "sea",
                FakePage::new("1959", &[], "Tempo 136", ""),
            );
        let mut resolver = resolver();

        let id = resolver
            .resolve(&mut driver, "Vienna", "Billy Joel")
            .await
            .unwrap();
        assert_eq!(id, "vienna");
        assert_eq!(resolver.last_attempt_mode(), Some(SearchMode::TitleOnly));
        assert_eq!(driver.typed_queries, vec!["Vienna,Billy Joel", "Vienna"]);
        assert_eq!(
            driver.commands.iter().filter(|c| *c == "reload").count(),
            1
        );

        // The next lookup starts with the artist appended again.
        let id = resolver
            .resolve(&mut driver, "Beyond the Sea", "Bobby Darin")
            .await
            .unwrap();
        assert_eq!(id, "sea");
        assert_eq!(
            driver.typed_queries.last().map(String::as_str),
            Some("Beyond the Sea,Bobby Darin")
        );
        assert_eq!(resolver.last_attempt_mode(), Some(SearchMode::WithArtist));
    }

    #[tokio::test]
    async fn test_resolve_fails_after_both_attempts() {
        let mut driver = FakeDriver::new();
        let mut resolver = resolver();

        let result = resolver.resolve(&mut driver, "Unknown", "Nobody").await;

        assert!(matches!(result, Err(FetchError::NotFound { ref title }) if title == "Unknown"));
        assert_eq!(driver.typed_queries, vec!["Unknown,Nobody", "Unknown"]);
        assert_eq!(
            driver.commands.iter().filter(|c| *c == "reload").count(),
            2
        );
    }

    #[tokio::test]
    async fn test_resolve_surfaces_reload_failure() {
        let mut driver = FakeDriver::new();
        driver.failing_reloads.push_back(true);
        let mut resolver = resolver();

        let result = resolver.resolve(&mut driver, "Unknown", "Nobody").await;

        assert!(matches!(
            result,
            Err(FetchError::Driver(DriverError::Session(_)))
        ));
    }

    #[tokio::test]
    async fn test_fetch_attributes_reads_detail_page() {
        let mut driver =
            FakeDriver::new().with_result("Bohemian Rhapsody,Queen", "bh", queen_page());
        let mut resolver = resolver();

        let attributes = resolver
            .fetch_attributes(&mut driver, "Bohemian Rhapsody", "Queen")
            .await
            .unwrap();

        assert_eq!(attributes.date_released(), Some("1975"));
        assert_eq!(attributes.genres().len(), 2);
        assert_eq!(attributes.tempo(), 72);
        assert_eq!(attributes.metric("Popularity"), Some("88"));
        assert_eq!(attributes.metric("Energy"), Some("40"));
    }

    #[tokio::test]
    async fn test_fetch_attributes_missing_album_data_leaves_year_absent() {
        let mut page = queen_page();
        page.album_data = None;
        let mut driver = FakeDriver::new().with_result("Song,Band", "s", page);
        let mut resolver = resolver();

        let attributes = resolver
            .fetch_attributes(&mut driver, "Song", "Band")
            .await
            .unwrap();
        assert_eq!(attributes.date_released(), None);
    }

    #[tokio::test]
    async fn test_fetch_attributes_malformed_metrics() {
        let page = FakePage::new("1999", &["pop"], "Tempo 100", "Energy: 40% Happiness:");
        let mut driver = FakeDriver::new().with_result("Song,Band", "s", page);
        let mut resolver = resolver();

        let result = resolver.fetch_attributes(&mut driver, "Song", "Band").await;
        assert!(matches!(
            result,
            Err(FetchError::Parse(ParseError::MalformedPage(_)))
        ));
    }

    #[tokio::test]
    async fn test_fetch_attributes_missing_tempo_span() {
        let mut page = queen_page();
        page.tempo_spans.truncate(1);
        let mut driver = FakeDriver::new().with_result("Song,Band", "s", page);
        let mut resolver = resolver();

        let result = resolver.fetch_attributes(&mut driver, "Song", "Band").await;
        assert!(matches!(
            result,
            Err(FetchError::Parse(ParseError::MalformedPage(_)))
        ));
    }
}
