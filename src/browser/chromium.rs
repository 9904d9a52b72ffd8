//! Chromium-backed [`BrowserDriver`] over the DevTools protocol.

use super::{BrowserDriver, DriverError};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Element, Page};
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Keeps sites from branching on `navigator.webdriver`.
const AUTOMATION_CONTROLLED_FLAG: &str = "--disable-blink-features=AutomationControlled";

/// How to launch the browser and how long element lookups may block.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub headless: bool,
    /// Path to a Chrome/Chromium binary; auto-detected when `None`.
    pub chrome_executable: Option<PathBuf>,
    /// Upper bound for a single element lookup before it reports not-found.
    pub element_timeout: Duration,
    /// Delay between element lookup attempts while waiting.
    pub poll_interval: Duration,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: !cfg!(feature = "headful"),
            chrome_executable: None,
            element_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(250),
        }
    }
}

struct Session {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl Session {
    async fn open(options: &LaunchOptions) -> Result<Self, DriverError> {
        let mut builder = BrowserConfig::builder().arg(AUTOMATION_CONTROLLED_FLAG);
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &options.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(DriverError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        // The handler drives the CDP connection and must be polled for the
        // whole lifetime of the browser.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!("Browser handler stopped: {}", e);
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| DriverError::Session(e.to_string()))?;

        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }

    async fn shutdown(mut self) -> Result<(), DriverError> {
        let result = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| DriverError::Session(e.to_string()));
        if let Err(e) = self.browser.wait().await {
            debug!("Browser process did not exit cleanly: {}", e);
        }
        self.handler_task.abort();
        result
    }
}

/// A single Chromium tab driven through `chromiumoxide`.
pub struct ChromiumDriver {
    options: LaunchOptions,
    session: Option<Session>,
}

impl ChromiumDriver {
    /// Launch a browser and open a blank tab.
    pub async fn launch(options: LaunchOptions) -> Result<Self, DriverError> {
        info!(
            "Launching browser (headless: {}, element timeout: {:?})",
            options.headless, options.element_timeout
        );
        let session = Session::open(&options).await?;
        Ok(Self {
            options,
            session: Some(session),
        })
    }

    fn page(&self) -> Result<&Page, DriverError> {
        self.session
            .as_ref()
            .map(|s| &s.page)
            .ok_or_else(|| DriverError::Session("browser session is closed".to_string()))
    }

    /// Poll for the first element matching `selector` until the element-wait
    /// timeout expires.
    async fn wait_for_element(&self, selector: &str) -> Result<Element, DriverError> {
        let page = self.page()?;
        let deadline = Instant::now() + self.options.element_timeout;
        loop {
            match page.find_element(selector).await {
                Ok(element) => return Ok(element),
                Err(e) => {
                    if Instant::now() >= deadline {
                        debug!("Giving up on {} after timeout: {}", selector, e);
                        return Err(DriverError::not_found(selector));
                    }
                }
            }
            tokio::time::sleep(self.options.poll_interval).await;
        }
    }
}

fn session_error(e: impl std::fmt::Display) -> DriverError {
    DriverError::Session(e.to_string())
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        debug!("Navigating to {}", url);
        self.page()?.goto(url).await.map_err(session_error)?;
        Ok(())
    }

    async fn reload(&mut self) -> Result<(), DriverError> {
        self.page()?.reload().await.map_err(session_error)?;
        Ok(())
    }

    async fn restart(&mut self) -> Result<(), DriverError> {
        if let Some(session) = self.session.take() {
            if let Err(e) = session.shutdown().await {
                warn!("Error while closing browser for restart: {}", e);
            }
        }
        info!("Relaunching browser");
        self.session = Some(Session::open(&self.options).await?);
        Ok(())
    }

    async fn type_text(&mut self, selector: &str, text: &str) -> Result<(), DriverError> {
        let element = self.wait_for_element(selector).await?;
        element
            .click()
            .await
            .map_err(session_error)?
            .type_str(text)
            .await
            .map_err(session_error)?;
        Ok(())
    }

    async fn attribute(
        &mut self,
        selector: &str,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        let element = self.wait_for_element(selector).await?;
        element.attribute(name).await.map_err(session_error)
    }

    async fn inner_text(&mut self, selector: &str) -> Result<String, DriverError> {
        let element = self.wait_for_element(selector).await?;
        Ok(element
            .inner_text()
            .await
            .map_err(session_error)?
            .unwrap_or_default())
    }

    async fn text_content(&mut self, selector: &str) -> Result<String, DriverError> {
        let element = self.wait_for_element(selector).await?;
        let returns = element
            .call_js_fn("function() { return this.textContent; }", false)
            .await
            .map_err(session_error)?;
        Ok(returns
            .result
            .value
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default())
    }

    async fn all_inner_texts(&mut self, selector: &str) -> Result<Vec<String>, DriverError> {
        // Matches the multi-element semantics of the trait: no implicit wait
        // beyond what the page already rendered, zero matches is not an error.
        let elements = match self.page()?.find_elements(selector).await {
            Ok(elements) => elements,
            Err(e) => {
                debug!("No elements for {}: {}", selector, e);
                return Ok(Vec::new());
            }
        };
        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            if let Some(text) = element.inner_text().await.map_err(session_error)? {
                texts.push(text);
            }
        }
        Ok(texts)
    }

    async fn is_present(&mut self, selector: &str) -> Result<bool, DriverError> {
        Ok(self.page()?.find_element(selector).await.is_ok())
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        match self.session.take() {
            Some(session) => {
                info!("Closing browser");
                session.shutdown().await
            }
            None => Ok(()),
        }
    }
}
