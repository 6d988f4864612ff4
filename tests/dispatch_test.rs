//! End-to-end dispatch scenarios over the scripted driver: classification,
//! protocol selection, redirect re-classification, and failure containment.

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use common::{ScriptedState, scripted_manager};
use pagefetch::download::DownloadExecutor;
use pagefetch::page_processor::{PageTotals, process_page};
use pagefetch::{FetchConfig, TabManager};
use tempfile::TempDir;

const PAGE: &str = "https://site.test/downloads";
const DRIVE_URL: &str = "https://drive.google.com/file/d/abc/view";
const CUSTOM_URL: &str = "https://example.org/dl?id=7";
const UNRELATED_URL: &str = "https://site.test/about";

fn test_config(download_dir: &TempDir) -> FetchConfig {
    FetchConfig::builder()
        .download_dir(download_dir.path())
        .element_wait_secs(0)
        .settle_secs(0)
        .completion_timeout_secs(1)
        .rule(r"drive\.google\.com", "drive")
        .rule(r"example\.org/dl\?id=\d+", "custom")
        .build()
        .unwrap()
}

fn setup(scripted: ScriptedState, config: &FetchConfig) -> (Arc<TabManager>, DownloadExecutor, Arc<std::sync::Mutex<ScriptedState>>) {
    let (manager, state) = scripted_manager(scripted);
    let tabs = Arc::new(manager);
    let executor = DownloadExecutor::new(Arc::clone(&tabs), config);
    (tabs, executor, state)
}

/// Scenario A: three anchors, two rules; drive and custom anchors are
/// dispatched, the unrelated one is skipped.
#[tokio::test(start_paused = true)]
async fn page_dispatches_matching_links_and_skips_the_rest() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    let mut scripted = ScriptedState::default();
    scripted.anchors.insert(
        PAGE.to_string(),
        vec![
            DRIVE_URL.to_string(),
            CUSTOM_URL.to_string(),
            UNRELATED_URL.to_string(),
            // anchor with no resolvable target
            String::new(),
        ],
    );
    scripted.control_urls.push(DRIVE_URL.to_string());
    let (tabs, executor, state) = setup(scripted, &config);

    let totals = process_page(&tabs, &executor, &config, PAGE).await;
    assert_eq!(
        totals,
        PageTotals {
            successful: 2,
            failed: 0
        }
    );

    let state = state.lock().unwrap();
    // Home loads the page, then one work-tab navigation per dispatched link
    assert_eq!(state.navigations, vec![PAGE, DRIVE_URL, CUSTOM_URL]);
    assert!(!state.navigations.iter().any(|u| u == UNRELATED_URL));
    assert_eq!(state.clicks, vec![DRIVE_URL]);
    assert_eq!(state.tabs_open, 1);
    assert_eq!(state.active, "home");
}

/// Scenario B: a custom link redirecting to Drive is re-dispatched exactly
/// once through the hosted protocol with the redirected URL.
#[tokio::test(start_paused = true)]
async fn custom_link_redirecting_to_drive_is_reclassified_once() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    let custom = "https://example.org/dl?id=9";
    let redirected = "https://drive.google.com/uc?id=9";

    let mut scripted = ScriptedState::default();
    scripted.redirects = HashMap::from([(custom.to_string(), redirected.to_string())]);
    scripted.control_urls.push(redirected.to_string());
    let (tabs, executor, state) = setup(scripted, &config);
    drop(tabs);

    assert!(executor.download_custom(custom).await);

    let state = state.lock().unwrap();
    assert_eq!(state.navigations, vec![custom, redirected]);
    assert_eq!(state.clicks, vec![redirected]);
    assert_eq!(state.tabs_open, 1);
    assert_eq!(state.active, "home");
}

/// A second redirect is a hosted-protocol failure, never a second
/// re-classification hop.
#[tokio::test(start_paused = true)]
async fn hosted_target_that_redirects_again_is_not_redispatched() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    let custom = "https://example.org/dl?id=3";
    let first_hop = "https://drive.google.com/uc?id=3";
    let second_hop = "https://drive.google.com/uc?id=3&confirm=t";

    let mut scripted = ScriptedState::default();
    scripted.redirects = HashMap::from([
        (custom.to_string(), first_hop.to_string()),
        (first_hop.to_string(), second_hop.to_string()),
    ]);
    // No download control anywhere: the hosted attempt times out
    let (tabs, executor, state) = setup(scripted, &config);
    drop(tabs);

    assert!(!executor.download_custom(custom).await);

    let state = state.lock().unwrap();
    // custom hop, then exactly one hosted dispatch; the second redirect is
    // followed by the browser but never re-dispatched
    assert_eq!(state.navigations, vec![custom, first_hop]);
    assert!(state.clicks.is_empty());
    assert_eq!(state.tabs_open, 1);
    assert_eq!(state.active, "home");
}

/// Scenario C: the download control never appears; the protocol fails and
/// the session still ends with only the home tab open.
#[tokio::test(start_paused = true)]
async fn hosted_control_timeout_fails_and_restores_home() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    let (tabs, executor, state) = setup(ScriptedState::default(), &config);
    drop(tabs);

    assert!(!executor.download_hosted(DRIVE_URL).await);

    let state = state.lock().unwrap();
    assert_eq!(state.tabs_open, 1);
    assert_eq!(state.active, "home");
    assert!(state.clicks.is_empty());
}

/// A transfer that never finishes counts as a failed download.
#[tokio::test(start_paused = true)]
async fn hosted_download_that_never_completes_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("file.zip.crdownload"), b"partial").unwrap();
    let config = test_config(&dir);

    let mut scripted = ScriptedState::default();
    scripted.control_urls.push(DRIVE_URL.to_string());
    let (tabs, executor, state) = setup(scripted, &config);
    drop(tabs);

    assert!(!executor.download_hosted(DRIVE_URL).await);

    let state = state.lock().unwrap();
    // The control was clicked; only the completion poll failed
    assert_eq!(state.clicks, vec![DRIVE_URL]);
    assert_eq!(state.tabs_open, 1);
    assert_eq!(state.active, "home");
}

/// A navigation error inside a protocol is contained to that link.
#[tokio::test(start_paused = true)]
async fn navigation_failure_is_contained_and_restores_home() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    let mut scripted = ScriptedState::default();
    scripted.failing_navigations.push(CUSTOM_URL.to_string());
    let (tabs, executor, state) = setup(scripted, &config);
    drop(tabs);

    assert!(!executor.download_custom(CUSTOM_URL).await);

    let state = state.lock().unwrap();
    assert_eq!(state.tabs_open, 1);
    assert_eq!(state.active, "home");
}

/// A page whose body never appears contributes zero links and zero counts.
#[tokio::test(start_paused = true)]
async fn page_load_timeout_yields_empty_totals() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    let mut scripted = ScriptedState::default();
    scripted.pages_without_body.push(PAGE.to_string());
    scripted
        .anchors
        .insert(PAGE.to_string(), vec![DRIVE_URL.to_string()]);
    let (tabs, executor, state) = setup(scripted, &config);

    let totals = process_page(&tabs, &executor, &config, PAGE).await;
    assert_eq!(totals, PageTotals::default());
    // No dispatch happened
    assert_eq!(state.lock().unwrap().navigations, vec![PAGE]);
}

/// Duplicate links are dispatched once each, in discovery order.
#[tokio::test(start_paused = true)]
async fn duplicate_links_are_not_deduplicated() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    let mut scripted = ScriptedState::default();
    scripted.anchors.insert(
        PAGE.to_string(),
        vec![CUSTOM_URL.to_string(), CUSTOM_URL.to_string()],
    );
    let (tabs, executor, state) = setup(scripted, &config);

    let totals = process_page(&tabs, &executor, &config, PAGE).await;
    assert_eq!(totals.successful, 2);
    assert_eq!(
        state.lock().unwrap().navigations,
        vec![PAGE, CUSTOM_URL, CUSTOM_URL]
    );
}
