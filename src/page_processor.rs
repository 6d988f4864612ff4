//! Per-page link discovery and dispatch
//!
//! Loads a page in the home tab, classifies every anchor against the pattern
//! rules, and feeds the matches one at a time to the download executor.
//! Page-level failures (load timeout, anchor enumeration errors) yield an
//! empty link list and the run continues with the next page.

use tracing::{debug, info, warn};

use crate::config::FetchConfig;
use crate::download::DownloadExecutor;
use crate::driver::{Tab, wait_for_element};
use crate::patterns::{CandidateLink, classify};
use crate::tabs::TabManager;

/// Download outcome counts for one page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageTotals {
    pub successful: usize,
    pub failed: usize,
}

/// Process a single page: extract matching links and download each one.
///
/// Links are dispatched sequentially in discovery order. Duplicate URLs are
/// dispatched once each; no dedup is applied.
pub async fn process_page(
    tabs: &TabManager,
    executor: &DownloadExecutor,
    config: &FetchConfig,
    page_url: &str,
) -> PageTotals {
    let links = extract_links(tabs.home().as_ref(), config, page_url).await;
    info!("Found {} matching links on {page_url}", links.len());

    let mut totals = PageTotals::default();
    for link in &links {
        if executor.dispatch(link).await {
            totals.successful += 1;
        } else {
            totals.failed += 1;
        }
    }

    info!(
        "Page summary for {page_url}: {} successful, {} failed",
        totals.successful, totals.failed
    );
    totals
}

/// Navigate the home tab to `page_url` and collect all classified anchors.
///
/// Anchors with no resolvable target are skipped; a page that never presents
/// a body within the bounded wait contributes no links.
async fn extract_links(
    home: &dyn Tab,
    config: &FetchConfig,
    page_url: &str,
) -> Vec<CandidateLink> {
    if let Err(e) = home.goto(page_url).await {
        warn!("Failed to load page {page_url}: {e:#}");
        return Vec::new();
    }

    if let Err(e) = wait_for_element(home, "body", config.element_wait_secs()).await {
        warn!("Timeout while loading page {page_url}: {e}");
        return Vec::new();
    }

    let anchors = match home.find_all("a").await {
        Ok(anchors) => anchors,
        Err(e) => {
            warn!("Failed to enumerate anchors on {page_url}: {e:#}");
            return Vec::new();
        }
    };

    let mut links = Vec::new();
    for anchor in &anchors {
        let href = match anchor.attribute("href").await {
            Ok(Some(href)) if !href.is_empty() => href,
            Ok(_) => continue,
            Err(e) => {
                debug!("Skipping anchor with unreadable href on {page_url}: {e:#}");
                continue;
            }
        };

        if let Some(label) = classify(&href, config.rules()) {
            links.push(CandidateLink {
                url: href,
                label: label.to_string(),
            });
        }
    }
    links
}
