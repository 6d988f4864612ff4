//! Download protocols and completion detection

pub mod completion;
pub mod protocol;

pub use completion::wait_for_completion;
pub use protocol::DownloadExecutor;
