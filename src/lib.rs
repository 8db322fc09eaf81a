//! packager-fetch - build-time acquisition of the standalone packager bundle
//!
//! Makes `standalone.html` available at a fixed path before the main build
//! runs: built from a local packager checkout when possible, otherwise
//! downloaded from the pinned release and checked against its SHA-256.

pub mod cli;
pub mod config;
pub mod digest;
pub mod error;
pub mod local;
pub mod metadata;
pub mod orchestrator;
pub mod remote;
pub mod ui;

pub use error::{FetchError, FetchResult};
pub use orchestrator::{Orchestrator, Outcome};
