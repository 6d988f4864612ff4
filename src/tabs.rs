//! Tab lifecycle management
//!
//! The session holds exactly one distinguished home tab plus at most one
//! transient work tab. Every download protocol acquires a work tab through
//! `TabManager` and releases it through `close_work_and_return_home`, which
//! must run on every exit path, whether the attempt succeeded or failed, so
//! the session always ends a download attempt with the home tab active and
//! no orphaned tabs.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::warn;

use crate::driver::{Driver, Tab};
use crate::error::{FetchError, FetchResult};

pub struct TabManager {
    driver: Arc<dyn Driver>,
    home: Arc<dyn Tab>,
    work: Mutex<Option<Arc<dyn Tab>>>,
}

impl TabManager {
    #[must_use]
    pub fn new(driver: Arc<dyn Driver>, home: Arc<dyn Tab>) -> Self {
        Self {
            driver,
            home,
            work: Mutex::new(None),
        }
    }

    /// The distinguished home tab
    #[must_use]
    pub fn home(&self) -> &Arc<dyn Tab> {
        &self.home
    }

    /// Open a new work tab and bring it to the foreground.
    ///
    /// # Errors
    /// Fails when a work tab is already open (single-work-tab invariant) or
    /// the driver cannot open a tab. A tab that opened but failed to
    /// activate stays tracked, so the release path still closes it.
    pub async fn open_work(&self) -> FetchResult<Arc<dyn Tab>> {
        let mut slot = self.work.lock().await;
        if slot.is_some() {
            return Err(FetchError::Interaction(
                "a work tab is already open".into(),
            ));
        }

        let tab = self.driver.open_tab().await?;
        *slot = Some(Arc::clone(&tab));
        tab.activate().await?;
        Ok(tab)
    }

    /// Close the tracked work tab (if any) and return focus to home.
    ///
    /// Safe to call when no work tab exists (no-op) and when the work tab
    /// never finished initializing: the tab count is checked before closing,
    /// never assumed. Failures here are logged, not propagated; this is a
    /// guaranteed cleanup, not a best-effort one, and callers must be able
    /// to run it unconditionally on every exit path.
    pub async fn close_work_and_return_home(&self) {
        let mut slot = self.work.lock().await;
        if let Some(tab) = slot.take() {
            let tab_count = self.driver.tab_count().await.unwrap_or(1);
            if tab_count > 1 {
                if let Err(e) = tab.close().await {
                    warn!("Failed to close work tab: {e:#}");
                }
            }
        }
        drop(slot);

        if let Err(e) = self.home.activate().await {
            warn!("Failed to return focus to home tab: {e:#}");
        }
    }
}
