//! Link classification against ordered pattern rules
//!
//! A page's anchors are matched against an ordered list of (regex, label)
//! rules; the first rule whose pattern is found anywhere in the URL decides
//! how the link is downloaded. Classification is pure: no driver access, no
//! side effects.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::constants::DRIVE_URL_PATTERN;

static DRIVE_RE: Lazy<Regex> = Lazy::new(|| {
    // DRIVE_URL_PATTERN is a literal-domain pattern; compilation cannot fail
    Regex::new(DRIVE_URL_PATTERN).unwrap_or_else(|e| panic!("invalid drive pattern: {e}"))
});

/// An ordered classification rule: first matching rule wins
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub(crate) regex: Regex,
    pub(crate) label: String,
}

impl PatternRule {
    /// Compile a rule from its raw pattern string.
    ///
    /// # Errors
    /// Returns an error if `pattern` is not a valid regex.
    pub fn new(pattern: &str, label: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            label: label.into(),
        })
    }

    /// The type label this rule assigns to matching URLs
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// A discovered anchor whose href matched some rule.
///
/// Ephemeral: lives only for the duration of one page's processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLink {
    pub url: String,
    pub label: String,
}

/// Classify a URL against ordered rules, first match wins.
///
/// The match is a substring search, not a full-match: rules like
/// `drive\.google\.com` hit anywhere in the URL. Returns `None` when no rule
/// matches, including for empty URLs.
#[must_use]
pub fn classify<'r>(url: &str, rules: &'r [PatternRule]) -> Option<&'r str> {
    if url.is_empty() {
        return None;
    }
    rules
        .iter()
        .find(|rule| rule.regex.is_match(url))
        .map(|rule| rule.label.as_str())
}

/// Check whether a URL points at Google Drive.
///
/// Used for redirect re-classification: a custom link whose navigation lands
/// on a Drive URL is re-dispatched through the hosted protocol.
#[must_use]
pub fn is_drive_url(url: &str) -> bool {
    DRIVE_RE.is_match(url)
}
