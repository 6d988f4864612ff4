//! Shared configuration constants for pagefetch
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

use std::time::Duration;

/// Default completion timeout: 60 seconds
///
/// How long to wait for the browser's download manager to finish a transfer
/// before treating the download as failed. Large files on slow links may need
/// more; users can raise it via `completion_timeout_secs`.
pub const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 60;

/// Interval between download-directory polls
///
/// The completion poller re-lists the download directory at this rate while
/// in-progress markers remain. One second matches the granularity browsers
/// rename partial files at; polling faster only burns syscalls.
pub const COMPLETION_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default bounded wait for an element to appear: 10 seconds
pub const DEFAULT_ELEMENT_WAIT_SECS: u64 = 10;

/// Interval between element-presence polls
pub const ELEMENT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Default settle delay after navigating a custom link: 2 seconds
///
/// Server-side and same-page redirects resolve asynchronously after the
/// initial response; this is the window we give them before inspecting the
/// active URL for re-classification. A heuristic, not a completion signal.
pub const DEFAULT_SETTLE_SECS: u64 = 2;

/// Settle delay between the Drive control appearing and clicking it
pub const CONTROL_SETTLE: Duration = Duration::from_secs(1);

/// Filename extensions browsers use to mark a not-yet-complete transfer
///
/// Chrome writes `<name>.crdownload` during transfer and renames on
/// completion; Firefox uses `.part`, Safari `.download`. Absence of all of
/// these is the only portable completion signal available without hooking
/// browser-internal download events.
pub const IN_PROGRESS_MARKERS: &[&str] = &[".crdownload", ".part", ".download"];

/// CSS selector for the Google Drive preview download control
pub const DRIVE_DOWNLOAD_SELECTOR: &str =
    "div.ndfHFb-c4YZDc-to915-LgbsSe[role='button'][aria-label='Download']";

/// Regex matched against active URLs to detect Drive-hosted redirects
pub const DRIVE_URL_PATTERN: &str = r"drive\.google\.com";

/// Rule label that selects the Drive-hosted download protocol
pub const DRIVE_LABEL: &str = "drive";

/// Chrome user agent string
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
/// Next update: 2025-04-29 (quarterly schedule)
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
