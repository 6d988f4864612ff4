//! Run configuration
//!
//! `FetchConfig` carries everything a run needs: download directory, timeout
//! bounds, headless flag, and the compiled pattern rules.

pub mod builder;
pub mod types;

pub use builder::FetchConfigBuilder;
pub use types::FetchConfig;
