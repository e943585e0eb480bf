use crate::error::{BuildError, Result};
use crate::runner::CommandRunner;
use std::fmt;

/// Builder name used when none is configured.
pub const DEFAULT_BUILDER: &str = "multiarch";

/// Driver able to export manifest lists for several platforms.
const BUILDER_DRIVER: &str = "docker-container";

/// Outcome of [`BuilderContext::create_or_get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    Created,
    Existing,
}

impl fmt::Display for BuilderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuilderState::Created => f.write_str("created"),
            BuilderState::Existing => f.write_str("reused"),
        }
    }
}

/// Handle to a named buildx builder instance.
///
/// Builds reference the builder explicitly with `--builder`, so the globally
/// selected builder of the docker installation is never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderContext {
    name: String,
}

impl BuilderContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create the builder, or confirm it already exists.
    pub async fn create_or_get<R: CommandRunner>(&self, runner: &R) -> Result<BuilderState> {
        let create = runner.capture(&self.create_args()).await?;
        if create.success() {
            tracing::info!("Created buildx builder '{}'", self.name);
            return Ok(BuilderState::Created);
        }

        tracing::debug!(
            "buildx create '{}' exited with {}: {}",
            self.name,
            create.code,
            create.stderr.trim()
        );

        let inspect = runner.capture(&self.inspect_args()).await?;
        if inspect.success() {
            tracing::info!("Reusing buildx builder '{}'", self.name);
            return Ok(BuilderState::Existing);
        }

        Err(BuildError::BuilderUnavailable {
            name: self.name.clone(),
            reason: format!(
                "create: {}; inspect: {}",
                describe_failure(create.code, &create.stderr),
                describe_failure(inspect.code, &inspect.stderr)
            ),
        })
    }

    fn create_args(&self) -> Vec<String> {
        vec![
            "buildx".to_string(),
            "create".to_string(),
            "--name".to_string(),
            self.name.clone(),
            "--driver".to_string(),
            BUILDER_DRIVER.to_string(),
        ]
    }

    fn inspect_args(&self) -> Vec<String> {
        vec![
            "buildx".to_string(),
            "inspect".to_string(),
            self.name.clone(),
        ]
    }
}

impl Default for BuilderContext {
    fn default() -> Self {
        Self::new(DEFAULT_BUILDER)
    }
}

fn describe_failure(code: i32, stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("exit code {}", code)
    } else {
        format!("exit code {} ({})", code, stderr)
    }
}
