//! Child process execution
//!
//! Install commands and rez subcommands run as child processes whose
//! exit code gates success. The trait seam keeps the pipeline testable
//! without spawning real processes.

use crate::error::{RezupError, RezupResult};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Abstract subprocess executor
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion with output passed through.
    /// Non-zero completion is fatal; there is no partial success.
    async fn run(&self, command: &[String]) -> RezupResult<()>;

    /// Run a command to completion, capturing its standard output.
    async fn run_captured(&self, command: &[String]) -> RezupResult<String>;
}

/// Runner backed by real child processes
pub struct ProcessRunner;

fn split(command: &[String]) -> RezupResult<(&String, &[String])> {
    command.split_first().ok_or(RezupError::EmptyCommand)
}

fn display(command: &[String]) -> String {
    command.join(" ")
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &[String]) -> RezupResult<()> {
        let (program, args) = split(command)?;
        debug!("Executing: {}", crate::exec::display(command));

        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| RezupError::command_failed(display(command), e))?;

        if status.success() {
            Ok(())
        } else {
            Err(RezupError::CommandExit {
                command: display(command),
                code: status.code().unwrap_or(-1),
            })
        }
    }

    async fn run_captured(&self, command: &[String]) -> RezupResult<String> {
        let (program, args) = split(command)?;
        debug!("Executing (captured): {}", crate::exec::display(command));

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .await
            .map_err(|e| RezupError::command_failed(display(command), e))?;

        if !output.status.success() {
            return Err(RezupError::CommandExit {
                command: display(command),
                code: output.status.code().unwrap_or(-1),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
