//! Browser-automation capability boundary
//!
//! The orchestration core never touches a concrete automation engine: it
//! drives tabs and elements through these traits. `chrome` implements them
//! over chromiumoxide; tests implement them with a scripted in-memory driver.

pub mod chrome;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::trace;

use crate::error::{FetchError, FetchResult};
use crate::utils::constants::ELEMENT_POLL_INTERVAL;

/// A handle to one element inside a tab's DOM
#[async_trait]
pub trait ElementHandle: Send + Sync {
    /// Read an attribute value, `None` when the attribute is absent
    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// Activate the element (click)
    async fn click(&self) -> Result<()>;
}

/// One isolated browsing context (tab) within the session
#[async_trait]
pub trait Tab: Send + Sync {
    /// Navigate the tab to a URL
    async fn goto(&self, url: &str) -> Result<()>;

    /// The tab's active URL after any redirects so far.
    ///
    /// Implementations return `about:blank` rather than erroring when the
    /// URL is not yet available.
    async fn current_url(&self) -> String;

    /// All elements currently matching a CSS selector, possibly empty
    async fn find_all(&self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>>;

    /// Bring the tab to the foreground
    async fn activate(&self) -> Result<()>;

    /// Close the tab
    async fn close(&self) -> Result<()>;
}

/// The browser session as a tab factory
#[async_trait]
pub trait Driver: Send + Sync {
    /// Open a new blank tab
    async fn open_tab(&self) -> Result<Arc<dyn Tab>>;

    /// Number of currently open tabs
    async fn tab_count(&self) -> Result<usize>;
}

/// Wait (bounded) for the first element matching `selector` to be present.
///
/// Polls the tab at a fixed interval; a lookup error counts as "not present
/// yet" rather than aborting the wait, since transient driver hiccups while
/// a page is still loading are indistinguishable from absence. Returns
/// `FetchError::NavigationTimeout` once the deadline passes.
pub async fn wait_for_element(
    tab: &dyn Tab,
    selector: &str,
    timeout_secs: u64,
) -> FetchResult<Box<dyn ElementHandle>> {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(timeout_secs);
    loop {
        match tab.find_all(selector).await {
            Ok(mut elements) if !elements.is_empty() => {
                return Ok(elements.remove(0));
            }
            Ok(_) => {}
            Err(e) => trace!(selector, "element lookup failed, retrying: {e:#}"),
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(FetchError::NavigationTimeout {
                what: format!("element '{selector}'"),
                waited_secs: timeout_secs,
            });
        }
        tokio::time::sleep(ELEMENT_POLL_INTERVAL).await;
    }
}
