//! Builder for `FetchConfig`
//!
//! Pattern rules are supplied as raw strings and compiled once here, keeping
//! regex compilation out of the per-link hot path and surfacing bad patterns
//! as configuration errors before the browser ever launches.

use std::path::PathBuf;

use crate::error::{FetchError, FetchResult};
use crate::patterns::PatternRule;
use crate::utils::constants::{
    DEFAULT_COMPLETION_TIMEOUT_SECS, DEFAULT_ELEMENT_WAIT_SECS, DEFAULT_SETTLE_SECS,
};

use super::types::FetchConfig;

#[derive(Debug, Default)]
pub struct FetchConfigBuilder {
    download_dir: Option<PathBuf>,
    headless: Option<bool>,
    element_wait_secs: Option<u64>,
    settle_secs: Option<u64>,
    completion_timeout_secs: Option<u64>,
    raw_rules: Vec<(String, String)>,
    chrome_data_dir: Option<PathBuf>,
}

impl FetchConfigBuilder {
    /// Directory the browser downloads into. Required.
    #[must_use]
    pub fn download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = Some(headless);
        self
    }

    #[must_use]
    pub fn element_wait_secs(mut self, secs: u64) -> Self {
        self.element_wait_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn settle_secs(mut self, secs: u64) -> Self {
        self.settle_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn completion_timeout_secs(mut self, secs: u64) -> Self {
        self.completion_timeout_secs = Some(secs);
        self
    }

    /// Append a classification rule. Order of calls is rule order.
    #[must_use]
    pub fn rule(mut self, pattern: impl Into<String>, label: impl Into<String>) -> Self {
        self.raw_rules.push((pattern.into(), label.into()));
        self
    }

    /// Append several rules at once, preserving their order
    #[must_use]
    pub fn rules<I, P, L>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = (P, L)>,
        P: Into<String>,
        L: Into<String>,
    {
        self.raw_rules
            .extend(rules.into_iter().map(|(p, l)| (p.into(), l.into())));
        self
    }

    #[must_use]
    pub fn chrome_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.chrome_data_dir = Some(dir.into());
        self
    }

    /// Validate, compile the pattern rules, and produce a `FetchConfig`.
    ///
    /// # Errors
    /// Returns `FetchError::Config` when the download directory is missing
    /// or a rule pattern fails to compile.
    pub fn build(self) -> FetchResult<FetchConfig> {
        let download_dir = self
            .download_dir
            .ok_or_else(|| FetchError::Config("download_dir is required".into()))?;

        // Normalize to absolute so CDP and the poller see the same directory
        let download_dir = if download_dir.is_absolute() {
            download_dir
        } else {
            std::env::current_dir()
                .map_err(|e| FetchError::Config(format!("cannot resolve working directory: {e}")))?
                .join(download_dir)
        };

        let mut rules = Vec::with_capacity(self.raw_rules.len());
        for (pattern, label) in self.raw_rules {
            let rule = PatternRule::new(&pattern, &label)
                .map_err(|e| FetchError::Config(format!("invalid pattern '{pattern}': {e}")))?;
            rules.push(rule);
        }

        Ok(FetchConfig {
            download_dir,
            headless: self.headless.unwrap_or(true),
            element_wait_secs: self.element_wait_secs.unwrap_or(DEFAULT_ELEMENT_WAIT_SECS),
            settle_secs: self.settle_secs.unwrap_or(DEFAULT_SETTLE_SECS),
            completion_timeout_secs: self
                .completion_timeout_secs
                .unwrap_or(DEFAULT_COMPLETION_TIMEOUT_SECS),
            rules,
            chrome_data_dir: self.chrome_data_dir,
        })
    }
}
