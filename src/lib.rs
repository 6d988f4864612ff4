//! pagefetch: browser-driven discovery and download of file links
//!
//! Drives one Chrome session to find downloadable-file links on a list of
//! pages, classify each link against ordered pattern rules, and execute the
//! matching download protocol. Redirects, slow transfers, and transient
//! failures are tolerated, and the session always returns to its home tab.

pub mod browser_setup;
pub mod config;
pub mod download;
pub mod driver;
pub mod error;
pub mod input;
pub mod page_processor;
pub mod patterns;
pub mod session;
pub mod tabs;
pub mod utils;

pub use browser_setup::{find_browser_executable, launch_browser, set_download_behavior};
pub use config::{FetchConfig, FetchConfigBuilder};
pub use download::{DownloadExecutor, wait_for_completion};
pub use driver::{Driver, ElementHandle, Tab, wait_for_element};
pub use error::{FetchError, FetchResult};
pub use input::{RunInput, load_input};
pub use page_processor::{PageTotals, process_page};
pub use patterns::{CandidateLink, PatternRule, classify, is_drive_url};
pub use session::{RunTotals, Session, run};
pub use tabs::TabManager;
