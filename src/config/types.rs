//! Core configuration types for download orchestration
//!
//! This module contains the main `FetchConfig` struct describing one run:
//! where the browser drops files, how long the bounded waits are, and the
//! ordered pattern rules links are classified against.

use std::path::{Path, PathBuf};

use crate::patterns::PatternRule;
use crate::utils::constants::{
    DEFAULT_COMPLETION_TIMEOUT_SECS, DEFAULT_ELEMENT_WAIT_SECS, DEFAULT_SETTLE_SECS,
};

/// Configuration for a download run
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Directory the browser is configured to download into.
    ///
    /// **INVARIANT:** Always an absolute path (normalized in builder), so
    /// the CDP download-behavior command and the completion poller agree on
    /// the same location regardless of the process working directory.
    pub(crate) download_dir: PathBuf,

    /// Run Chrome headless
    pub(crate) headless: bool,

    /// Bounded wait for the page body / download control to appear
    pub(crate) element_wait_secs: u64,

    /// Settle delay after navigating a custom link, before inspecting the
    /// active URL for redirect re-classification
    pub(crate) settle_secs: u64,

    /// How long the completion poller waits for in-progress markers to clear
    pub(crate) completion_timeout_secs: u64,

    /// Ordered classification rules, compiled at build time
    pub(crate) rules: Vec<PatternRule>,

    /// Chrome user data directory. When unset, a per-process temp
    /// directory is created (and removed) by the session.
    pub(crate) chrome_data_dir: Option<PathBuf>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("downloads"),
            headless: true,
            element_wait_secs: DEFAULT_ELEMENT_WAIT_SECS,
            settle_secs: DEFAULT_SETTLE_SECS,
            completion_timeout_secs: DEFAULT_COMPLETION_TIMEOUT_SECS,
            rules: Vec::new(),
            chrome_data_dir: None,
        }
    }
}

impl FetchConfig {
    /// Start building a configuration
    #[must_use]
    pub fn builder() -> super::builder::FetchConfigBuilder {
        super::builder::FetchConfigBuilder::default()
    }

    #[must_use]
    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn element_wait_secs(&self) -> u64 {
        self.element_wait_secs
    }

    #[must_use]
    pub fn settle_secs(&self) -> u64 {
        self.settle_secs
    }

    #[must_use]
    pub fn completion_timeout_secs(&self) -> u64 {
        self.completion_timeout_secs
    }

    /// The ordered classification rules for this run
    #[must_use]
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    #[must_use]
    pub fn chrome_data_dir(&self) -> Option<&PathBuf> {
        self.chrome_data_dir.as_ref()
    }
}
