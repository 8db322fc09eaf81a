//! Package manager invocation for the local packager build

use crate::error::{FetchError, FetchResult};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Runs the dependency install and build steps of the packager project
#[async_trait]
pub trait PackageManager: Send + Sync {
    /// Install dependencies inside `dir`
    async fn install(&self, dir: &Path) -> FetchResult<()>;

    /// Build the standalone bundle inside `dir`
    async fn build(&self, dir: &Path) -> FetchResult<()>;
}

/// Package manager driven through an external executable (npm by default)
#[derive(Debug, Clone)]
pub struct CommandPackageManager {
    program: String,
    install_args: Vec<String>,
    build_args: Vec<String>,
}

impl CommandPackageManager {
    /// Create a runner for `program` with the given step arguments
    pub fn new(
        program: impl Into<String>,
        install_args: Vec<String>,
        build_args: Vec<String>,
    ) -> Self {
        Self {
            program: program.into(),
            install_args,
            build_args,
        }
    }

    /// Run one step with inherited stdio, interpreting only the exit code
    async fn run_step(&self, step: &str, dir: &Path, args: &[String]) -> FetchResult<()> {
        let command = format!("{} {}", self.program, args.join(" "));
        debug!("Executing in {}: {}", dir.display(), command);

        let status = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| FetchError::command_failed(command, e))?;

        match status.code() {
            Some(0) => Ok(()),
            Some(code) => Err(FetchError::CommandStatus {
                step: step.to_string(),
                code,
            }),
            None => Err(FetchError::CommandSignaled {
                step: step.to_string(),
            }),
        }
    }
}

#[async_trait]
impl PackageManager for CommandPackageManager {
    async fn install(&self, dir: &Path) -> FetchResult<()> {
        self.run_step("install", dir, &self.install_args).await
    }

    async fn build(&self, dir: &Path) -> FetchResult<()> {
        self.run_step("build", dir, &self.build_args).await
    }
}
