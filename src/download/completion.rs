//! Download completion detection
//!
//! Browser download managers write a partial-file marker during transfer and
//! rename to the final name on completion, so the absence of markers in the
//! download directory is the only portable completion signal available
//! without hooking browser-internal download events.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use crate::utils::constants::{COMPLETION_POLL_INTERVAL, IN_PROGRESS_MARKERS};

/// Wait until no in-progress markers remain in `dir`, or `timeout` elapses.
///
/// Returns `true` as soon as the directory holds no marker files, `false`
/// once the total elapsed time exceeds `timeout`. A directory that becomes
/// unreadable mid-poll is treated as failure rather than propagated;
/// transient filesystem errors must not abort the run.
pub async fn wait_for_completion(dir: &Path, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        match markers_present(dir).await {
            Ok(false) => return true,
            Ok(true) => debug!("download in progress in {}", dir.display()),
            Err(e) => {
                warn!("cannot inspect download directory {}: {e}", dir.display());
                return false;
            }
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(COMPLETION_POLL_INTERVAL).await;
    }
}

async fn markers_present(dir: &Path) -> std::io::Result<bool> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if IN_PROGRESS_MARKERS
            .iter()
            .any(|marker| name.ends_with(marker))
        {
            return Ok(true);
        }
    }
    Ok(false)
}
