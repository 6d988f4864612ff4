//! Session orchestration
//!
//! Owns the single browser session for a run: startup (fatal on failure),
//! the page loop, and teardown that must happen however the loop exits.
//! Page- and link-level failures never reach this layer (they are already
//! converted to counts below it), so the teardown path is structural, not
//! error-handling.

use std::path::PathBuf;
use std::sync::Arc;

use chromiumoxide::browser::Browser;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::browser_setup::{launch_browser, set_download_behavior};
use crate::config::FetchConfig;
use crate::download::DownloadExecutor;
use crate::driver::chrome::{ChromeDriver, ChromeTab};
use crate::driver::{Driver, Tab};
use crate::error::{FetchError, FetchResult};
use crate::page_processor::process_page;
use crate::tabs::TabManager;

/// Aggregate download counts across a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    pub successful: usize,
    pub failed: usize,
}

/// One live browser session: the browser process, its CDP handler task, and
/// the home tab every download attempt returns to.
pub struct Session {
    browser: Arc<Browser>,
    handler_task: JoinHandle<()>,
    profile_dir: PathBuf,
    remove_profile_dir: bool,
    driver: Arc<dyn Driver>,
    home: Arc<dyn Tab>,
}

impl Session {
    /// Start the browser session.
    ///
    /// # Errors
    /// Any failure here is `FetchError::SessionSetup`: fatal, since nothing
    /// can proceed without a session. A browser that launched before a later
    /// setup step failed is torn down again before returning.
    pub async fn start(config: &FetchConfig) -> FetchResult<Self> {
        tokio::fs::create_dir_all(config.download_dir())
            .await
            .map_err(|e| {
                FetchError::SessionSetup(format!(
                    "cannot create download directory {}: {e}",
                    config.download_dir().display()
                ))
            })?;

        let remove_profile_dir = config.chrome_data_dir().is_none();
        let (browser, handler_task, profile_dir) =
            launch_browser(config.headless(), config.chrome_data_dir().cloned())
                .await
                .map_err(|e| FetchError::SessionSetup(format!("{e:#}")))?;

        let home_page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                teardown_browser(browser, handler_task, &profile_dir, remove_profile_dir).await;
                return Err(FetchError::SessionSetup(format!(
                    "cannot open home tab: {e}"
                )));
            }
        };

        if let Err(e) = set_download_behavior(&home_page, config.download_dir()).await {
            teardown_browser(browser, handler_task, &profile_dir, remove_profile_dir).await;
            return Err(FetchError::SessionSetup(format!("{e:#}")));
        }

        info!("Browser session started");
        let browser = Arc::new(browser);
        let driver: Arc<dyn Driver> = Arc::new(ChromeDriver::new(Arc::clone(&browser)));
        let home: Arc<dyn Tab> = Arc::new(ChromeTab::new(home_page));

        Ok(Self {
            browser,
            handler_task,
            profile_dir,
            remove_profile_dir,
            driver,
            home,
        })
    }

    /// Build a tab manager rooted at this session's home tab
    #[must_use]
    pub fn tab_manager(&self) -> TabManager {
        TabManager::new(Arc::clone(&self.driver), Arc::clone(&self.home))
    }

    /// Tear the session down: stop the handler task, close the browser, wait
    /// for the process to exit, and remove the temp profile.
    pub async fn close(self) {
        let Self {
            browser,
            handler_task,
            profile_dir,
            remove_profile_dir,
            driver,
            home,
        } = self;

        // Release the remaining browser handles so the Arc unwraps below
        drop(driver);
        drop(home);

        match Arc::try_unwrap(browser) {
            Ok(browser) => {
                teardown_browser(browser, handler_task, &profile_dir, remove_profile_dir).await;
            }
            Err(arc) => {
                warn!(
                    "Browser still has {} strong references, teardown deferred to drop",
                    Arc::strong_count(&arc)
                );
                handler_task.abort();
            }
        }
    }
}

async fn teardown_browser(
    mut browser: Browser,
    handler_task: JoinHandle<()>,
    profile_dir: &std::path::Path,
    remove_profile_dir: bool,
) {
    handler_task.abort();
    if let Err(e) = handler_task.await
        && !e.is_cancelled()
    {
        warn!("Handler task failed during abort: {e}");
    }

    if let Err(e) = browser.close().await {
        warn!("Failed to close browser: {e}");
    }
    // Wait for the process to fully exit before touching its profile dir
    if let Err(e) = browser.wait().await {
        warn!("Failed to wait for browser exit: {e}");
    }

    if remove_profile_dir {
        if let Err(e) = std::fs::remove_dir_all(profile_dir) {
            warn!(
                "Failed to remove profile directory {}: {e}",
                profile_dir.display()
            );
        } else {
            debug!("Profile directory removed");
        }
    }
}

/// Run the whole download session: start the browser, process every page,
/// and always tear the session down before returning.
///
/// # Errors
/// Only session setup can fail; everything past it is contained into counts.
pub async fn run(config: &FetchConfig, pages: &[String]) -> FetchResult<RunTotals> {
    let session = Session::start(config).await?;

    let tabs = Arc::new(session.tab_manager());
    let executor = DownloadExecutor::new(Arc::clone(&tabs), config);

    let mut totals = RunTotals::default();
    for page_url in pages {
        info!("Processing webpage: {page_url}");
        let page = process_page(&tabs, &executor, config, page_url).await;
        totals.successful += page.successful;
        totals.failed += page.failed;
    }

    // Drop the remaining driver handles before teardown so the session owns
    // the last browser reference
    drop(executor);
    drop(tabs);
    session.close().await;

    info!(
        "Final summary - Total downloads: {} successful, {} failed",
        totals.successful, totals.failed
    );
    Ok(totals)
}
