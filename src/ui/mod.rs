//! Terminal feedback for interactive runs
//!
//! Build scripts usually run without a TTY, in which case everything is
//! reported through `tracing` and the helpers here stay silent.

mod context;
mod progress;

pub use context::UiContext;
pub use progress::DownloadSpinner;
