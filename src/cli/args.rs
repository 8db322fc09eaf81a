//! CLI argument definitions using clap derive

use crate::config::Overrides;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// packager-fetch - make the standalone packager bundle available
///
/// Builds the bundle from a sibling packager checkout when one exists,
/// otherwise downloads the pinned release and verifies its SHA-256.
#[derive(Parser, Debug)]
#[command(name = "packager-fetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project root that relative config paths resolve against
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file path
    #[arg(short, long, env = "PACKAGER_FETCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Local packager checkout to build from
    #[arg(long, env = "MISTWARP_PACKAGER_DIR")]
    pub packager_dir: Option<PathBuf>,

    /// Where to place the standalone bundle
    #[arg(long)]
    pub dest: Option<PathBuf>,

    /// Pinned release metadata (JSON with "src" and "sha256")
    #[arg(long)]
    pub metadata: Option<PathBuf>,

    /// Never use a local packager checkout
    #[arg(long)]
    pub no_local: bool,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    /// Parse the `general.log_format` config value, defaulting to text
    pub fn from_config(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

impl Cli {
    /// Values that take precedence over the config file
    pub fn overrides(&self) -> Overrides {
        Overrides {
            packager_dir: self.packager_dir.clone(),
            destination: self.dest.clone(),
            metadata: self.metadata.clone(),
            no_local: self.no_local,
        }
    }

    /// Log filter directive for the chosen verbosity
    pub fn log_directive(&self) -> &'static str {
        if self.quiet {
            return "packager_fetch=warn";
        }
        match self.verbose {
            0 => "packager_fetch=info",
            1 => "packager_fetch=debug",
            _ => "packager_fetch=trace",
        }
    }
}
