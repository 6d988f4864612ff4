//! Download protocol execution
//!
//! Two protocols, selected by a link's classification label:
//!
//! - **hosted**: the link points at a Google Drive preview; the file is
//!   fetched by clicking the preview's download control in a work tab.
//! - **custom**: the link is expected to trigger a direct download on
//!   navigation; if the navigation instead redirects to a Drive URL, the
//!   link is re-dispatched once through the hosted protocol.
//!
//! Both protocols release their work tab unconditionally and convert every
//! error into a `false` result at this boundary: one bad link must never
//! stop the rest of the run.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::FetchConfig;
use crate::download::completion::wait_for_completion;
use crate::error::{FetchError, FetchResult};
use crate::driver::wait_for_element;
use crate::patterns::{CandidateLink, is_drive_url};
use crate::tabs::TabManager;
use crate::utils::constants::{CONTROL_SETTLE, DRIVE_DOWNLOAD_SELECTOR, DRIVE_LABEL};

/// Executes download protocols against one tab manager
pub struct DownloadExecutor {
    tabs: Arc<TabManager>,
    download_dir: PathBuf,
    element_wait_secs: u64,
    settle_secs: u64,
    completion_timeout: Duration,
}

/// What the custom protocol observed after the settle delay
enum CustomOutcome {
    /// Navigation stayed put (or went somewhere non-Drive) and the
    /// download completed
    Done,
    /// Navigation landed on a Drive URL; holds the redirected URL
    DriveRedirect(String),
}

impl DownloadExecutor {
    #[must_use]
    pub fn new(tabs: Arc<TabManager>, config: &FetchConfig) -> Self {
        Self {
            tabs,
            download_dir: config.download_dir().to_path_buf(),
            element_wait_secs: config.element_wait_secs(),
            settle_secs: config.settle_secs(),
            completion_timeout: Duration::from_secs(config.completion_timeout_secs()),
        }
    }

    /// Dispatch a classified link to the protocol its label selects
    pub async fn dispatch(&self, link: &CandidateLink) -> bool {
        info!("Processing {} link: {}", link.label, link.url);
        if link.label == DRIVE_LABEL {
            self.download_hosted(&link.url).await
        } else {
            self.download_custom(&link.url).await
        }
    }

    /// Drive-hosted protocol: navigate a work tab to the preview, click the
    /// download control, poll for completion.
    pub async fn download_hosted(&self, url: &str) -> bool {
        let result = self.hosted_flow(url).await;
        self.tabs.close_work_and_return_home().await;
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("Hosted download failed for {url}: {e}");
                false
            }
        }
    }

    async fn hosted_flow(&self, url: &str) -> FetchResult<()> {
        let tab = self.tabs.open_work().await?;
        tab.goto(url).await?;

        let control =
            wait_for_element(tab.as_ref(), DRIVE_DOWNLOAD_SELECTOR, self.element_wait_secs).await?;

        tokio::time::sleep(CONTROL_SETTLE).await;
        control.click().await?;

        self.poll_completion().await
    }

    /// Custom-URL protocol: navigate a work tab and let the navigation
    /// itself trigger the download, re-dispatching once through the hosted
    /// protocol when a redirect lands on Drive.
    pub async fn download_custom(&self, url: &str) -> bool {
        let outcome = self.custom_flow(url).await;
        self.tabs.close_work_and_return_home().await;
        match outcome {
            Ok(CustomOutcome::Done) => true,
            Ok(CustomOutcome::DriveRedirect(target)) => {
                info!("Redirected to Drive link: {target}");
                // One re-classification hop only: the hosted protocol never
                // inspects the URL again, so a second redirect is a hosted
                // timeout failure, not another dispatch.
                self.download_hosted(&target).await
            }
            Err(e) => {
                warn!("Custom download failed for {url}: {e}");
                false
            }
        }
    }

    async fn custom_flow(&self, url: &str) -> FetchResult<CustomOutcome> {
        let tab = self.tabs.open_work().await?;
        tab.goto(url).await?;

        // Give server-side or same-page redirects time to resolve before
        // deciding which protocol this link really needs
        tokio::time::sleep(Duration::from_secs(self.settle_secs)).await;

        let current = tab.current_url().await;
        if is_drive_url(&current) {
            return Ok(CustomOutcome::DriveRedirect(current));
        }

        self.poll_completion().await?;
        Ok(CustomOutcome::Done)
    }

    async fn poll_completion(&self) -> FetchResult<()> {
        if wait_for_completion(&self.download_dir, self.completion_timeout).await {
            Ok(())
        } else {
            Err(FetchError::PollTimeout(self.completion_timeout.as_secs()))
        }
    }
}
