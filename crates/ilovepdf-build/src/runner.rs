//! Process execution seam
//!
//! Everything the orchestrator does to the outside world goes through
//! [`CommandRunner`], so the docker binary can be swapped for a dry run or a
//! scripted fake in tests.

use crate::error::{BuildError, Result};
use colored::Colorize;
use std::process::Stdio;
use tokio::process::Command;

/// Exit code reported when a process ends without one (killed by a signal).
pub const SIGNALED_EXIT_CODE: i32 = 1;

#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run to completion with stdout/stderr captured.
    async fn capture(&self, args: &[String]) -> Result<CommandOutput>;

    /// Run to completion with the terminal attached; returns the exit code.
    async fn stream(&self, args: &[String]) -> Result<i32>;
}

/// Runs the docker CLI (or a compatible binary).
pub struct DockerCli {
    program: String,
}

impl DockerCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }


    fn command(&self, args: &[String]) -> Command {
        tracing::debug!("Running: {} {}", self.program, args.join(" "));
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        cmd
    }

    fn spawn_error(&self, source: std::io::Error) -> BuildError {
        BuildError::Spawn {
            program: self.program.clone(),
            source,
        }
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl CommandRunner for DockerCli {
    async fn capture(&self, args: &[String]) -> Result<CommandOutput> {
        let output = self
            .command(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        Ok(CommandOutput {
            code: output.status.code().unwrap_or(SIGNALED_EXIT_CODE),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    async fn stream(&self, args: &[String]) -> Result<i32> {
        let status = self
            .command(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| self.spawn_error(e))?;

        Ok(status.code().unwrap_or(SIGNALED_EXIT_CODE))
    }
}

/// Prints the commands that would run and reports success for each.
pub struct DryRun {
    program: String,
}

impl DryRun {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn print(&self, args: &[String]) {
        println!("{} {} {}", "$".dimmed(), self.program, args.join(" "));
    }
}

impl CommandRunner for DryRun {
    async fn capture(&self, args: &[String]) -> Result<CommandOutput> {
        self.print(args);
        Ok(CommandOutput::default())
    }

    async fn stream(&self, args: &[String]) -> Result<i32> {
        self.print(args);
        Ok(0)
    }
}
