//! Multi-platform build orchestration
//!
//! One run prepares the buildx builder, then performs a single
//! `docker buildx build` for every requested platform that either pushes the
//! result or loads it locally.

use crate::builder::{BuilderContext, BuilderState};
use crate::error::Result;
use crate::platform::Platform;
use crate::progress::BuildProgress;
use crate::request::{BuildRequest, OutputMode};
use crate::runner::CommandRunner;
use colored::Colorize;

/// Result of a finished build invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    /// Exit code of `docker buildx build`.
    pub exit_code: i32,
    /// `None` when the builder could not be prepared.
    pub builder: Option<BuilderState>,
    pub platforms: Vec<Platform>,
}

impl BuildOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

pub struct Orchestrator<R> {
    runner: R,
    builder: BuilderContext,
    native: Option<Platform>,
    show_progress: bool,
}

impl<R: CommandRunner> Orchestrator<R> {
    pub fn new(runner: R, builder: BuilderContext) -> Self {
        Self {
            runner,
            builder,
            native: Platform::native(),
            show_progress: true,
        }
    }

    /// Override the detected host platform.
    pub fn with_native_platform(mut self, native: Option<Platform>) -> Self {
        self.native = native;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    #[cfg(test)]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Prepare the builder and run the build.
    ///
    /// A non-zero build exit is reported through [`BuildOutcome::exit_code`],
    /// not as an error.
    pub async fn run(&self, request: &BuildRequest) -> Result<BuildOutcome> {
        request.validate()?;

        if let Err(e) = request.image.validate_tag() {
            tracing::warn!("{}; passing it to docker unchanged", e);
        }

        let builder = self.prepare_builder().await;

        let platforms = request.effective_platforms(self.native.as_ref());
        if request.native_only && request.output == OutputMode::Load && platforms.len() > 1 {
            tracing::warn!(
                "Host platform {} is not among the requested platforms; building all of {}",
                self.native
                    .as_ref()
                    .map(Platform::as_str)
                    .unwrap_or("(unknown)"),
                Platform::join(&platforms)
            );
        }

        let args = build_command(request, &self.builder, &platforms);

        match request.output {
            OutputMode::Push => println!(
                "{} {} for {} and pushing",
                "Building".green().bold(),
                request.image.to_string().cyan(),
                Platform::join(&platforms).cyan()
            ),
            OutputMode::Load => println!(
                "{} {} for {} and loading locally",
                "Building".green().bold(),
                request.image.to_string().cyan(),
                Platform::join(&platforms).cyan()
            ),
        }

        let exit_code = self.runner.stream(&args).await?;
        if exit_code == 0 {
            tracing::info!("Successfully built: {}", request.image);
        } else {
            tracing::error!("docker buildx build exited with code {}", exit_code);
        }

        Ok(BuildOutcome {
            exit_code,
            builder,
            platforms,
        })
    }

    /// Setup failures are logged and never stop the build.
    async fn prepare_builder(&self) -> Option<BuilderState> {
        let message = format!("Preparing buildx builder '{}'...", self.builder.name());
        let progress = if self.show_progress {
            BuildProgress::new(&message)
        } else {
            BuildProgress::hidden(&message)
        };

        match self.builder.create_or_get(&self.runner).await {
            Ok(state) => {
                progress.finish_success(&format!("Builder '{}' {}", self.builder.name(), state));
                Some(state)
            }
            Err(e) => {
                progress.finish_warning(&format!(
                    "Builder '{}' unavailable, continuing",
                    self.builder.name()
                ));
                tracing::warn!("{}", e);
                None
            }
        }
    }
}

/// Arguments for `docker buildx build`, program name excluded.
pub fn build_command(
    request: &BuildRequest,
    builder: &BuilderContext,
    platforms: &[Platform],
) -> Vec<String> {
    let mut args = vec![
        "buildx".to_string(),
        "build".to_string(),
        "--builder".to_string(),
        builder.name().to_string(),
        "--platform".to_string(),
        Platform::join(platforms),
        "-t".to_string(),
        request.image.to_string(),
    ];

    if let Some(dockerfile) = &request.dockerfile {
        args.push("-f".to_string());
        args.push(dockerfile.display().to_string());
    }

    for (key, value) in &request.build_args {
        args.push("--build-arg".to_string());
        args.push(format!("{}={}", key, value));
    }

    if request.no_cache {
        args.push("--no-cache".to_string());
    }

    match request.output {
        OutputMode::Push => args.push("--push".to_string()),
        OutputMode::Load => args.push("--load".to_string()),
    }

    args.push(request.context.display().to_string());
    args
}
