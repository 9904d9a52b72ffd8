//! Synchronization after navigating to a detail page.

use crate::browser::{BrowserDriver, DriverError};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// How to wait for a freshly navigated page before reading it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitStrategy {
    /// Sleep for a fixed duration.
    FixedDelay(Duration),
    /// Poll until `selector` is present, giving up after `timeout`.
    UntilPresent {
        selector: String,
        timeout: Duration,
        interval: Duration,
    },
}

impl Default for WaitStrategy {
    fn default() -> Self {
        WaitStrategy::FixedDelay(Duration::from_secs(2))
    }
}

impl WaitStrategy {
    /// Block until the page is considered ready.
    ///
    /// A polling wait that times out is not an error: reads that follow will
    /// surface missing elements on their own.
    pub async fn wait(&self, driver: &mut dyn BrowserDriver) -> Result<(), DriverError> {
        match self {
            WaitStrategy::FixedDelay(delay) => {
                pause(*delay).await;
                Ok(())
            }
            WaitStrategy::UntilPresent {
                selector,
                timeout,
                interval,
            } => {
                let deadline = Instant::now() + *timeout;
                while !driver.is_present(selector).await? {
                    if Instant::now() >= deadline {
                        warn!("{} still missing after {:?}", selector, timeout);
                        return Ok(());
                    }
                    tokio::time::sleep(*interval).await;
                }
                debug!("{} is present", selector);
                Ok(())
            }
        }
    }
}

/// Sleep for `duration`; zero returns immediately.
pub(crate) async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
