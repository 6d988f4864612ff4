//! Input file loading
//!
//! A run is described by a JSON file with a `links` array of page URLs and an
//! optional `patterns` array of `{pattern, type}` rules. When no patterns are
//! supplied the default rule set is used.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::error::{FetchError, FetchResult};
use crate::utils::constants::DRIVE_LABEL;

/// Default rule set used when the input file supplies no patterns
pub const DEFAULT_PATTERNS: &[(&str, &str)] = &[
    (r"drive\.google\.com", DRIVE_LABEL),
    (r"chiuchang\.org\.tw/modules/mydownloads/visit\.php\?lid=\d+", "custom"),
];

/// One raw `{pattern, type}` entry as it appears in the input file
#[derive(Debug, Clone, Deserialize)]
pub struct RawPattern {
    pub pattern: String,
    #[serde(rename = "type")]
    pub label: String,
}

#[derive(Debug, Deserialize)]
struct InputFile {
    links: Vec<String>,
    #[serde(default)]
    patterns: Vec<RawPattern>,
}

/// Page URLs and raw pattern rules for one run
#[derive(Debug, Clone)]
pub struct RunInput {
    pub pages: Vec<String>,
    pub patterns: Vec<RawPattern>,
}

/// Load a run description from a JSON file.
///
/// # Errors
/// Returns `FetchError::Config` when the file is missing, is not valid JSON,
/// lacks a `links` array, the array is empty, or a link is not a valid URL.
pub fn load_input(path: &Path) -> FetchResult<RunInput> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| FetchError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: InputFile = serde_json::from_str(&text)
        .map_err(|e| FetchError::Config(format!("invalid input file {}: {e}", path.display())))?;

    if parsed.links.is_empty() {
        return Err(FetchError::Config(format!(
            "no page links found in {}",
            path.display()
        )));
    }

    for link in &parsed.links {
        Url::parse(link)
            .map_err(|e| FetchError::Config(format!("invalid page link {link:?}: {e}")))?;
    }

    let patterns = if parsed.patterns.is_empty() {
        warn!("input file supplies no patterns, using defaults");
        DEFAULT_PATTERNS
            .iter()
            .map(|(pattern, label)| RawPattern {
                pattern: (*pattern).to_string(),
                label: (*label).to_string(),
            })
            .collect()
    } else {
        parsed.patterns
    };

    Ok(RunInput {
        pages: parsed.links,
        patterns,
    })
}
