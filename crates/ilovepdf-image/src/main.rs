mod settings;

use clap::{ArgAction, Parser};
use colored::Colorize;
use ilovepdf_build::{
    BuildError, BuildOutcome, CommandRunner, DockerCli, DryRun, Orchestrator, OutputMode,
};
use settings::Settings;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "ilovepdf-image")]
#[command(version)]
#[command(
    about = "Build the ilovepdf image for linux/amd64 and linux/arm64",
    long_about = "Build the ilovepdf image for linux/amd64 and linux/arm64 with docker buildx.\n\
                  Without `push` the result is loaded into the local image store; with `push`\n\
                  the multi-arch manifest and every platform image go to the registry."
)]
pub struct Cli {
    /// Image name and tag [default: ilovepdf:latest]
    pub image: Option<String>,

    /// `push` to publish to the registry; anything else builds and loads locally
    pub push: Option<String>,

    /// Target platform, repeatable (default: linux/amd64 and linux/arm64)
    #[arg(long = "platform", value_name = "PLATFORM")]
    pub platforms: Vec<String>,

    /// buildx builder instance to create or reuse
    #[arg(long, env = "ILOVEPDF_BUILDER")]
    pub builder: Option<String>,

    /// Path to the Dockerfile
    #[arg(short = 'f', long = "file", value_name = "DOCKERFILE")]
    pub dockerfile: Option<PathBuf>,

    /// Build context directory [default: .]
    #[arg(long, value_name = "DIR")]
    pub context: Option<PathBuf>,

    /// Build-time variable, repeatable
    #[arg(long = "build-arg", value_name = "KEY=VALUE", value_parser = parse_build_arg)]
    pub build_args: Vec<(String, String)>,

    /// Do not use the build cache
    #[arg(long)]
    pub no_cache: bool,

    /// Load only the host-native platform (ignored with `push`)
    #[arg(long)]
    pub native_only: bool,

    /// Print the docker commands instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Config file (default: image-build.kdl discovery)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// docker-compatible CLI to run
    #[arg(long, env = "ILOVEPDF_DOCKER", value_name = "PROGRAM")]
    pub docker: Option<String>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

fn parse_build_arg(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => ExitCode::from(exit_status(code)),
        Err(e) => {
            let message = match e.downcast_ref::<BuildError>() {
                Some(build_error) => build_error.user_message(),
                None => format!("{:#}", e),
            };
            eprintln!("{} {}", "Error:".red().bold(), message);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let loaded = ilovepdf_config::load_config(cli.config.clone())?;
    if let Some((path, _)) = &loaded {
        tracing::info!("Using config file {}", path.display());
    }

    let settings = Settings::resolve(&cli, loaded.map(|(_, config)| config))?;
    tracing::debug!(?settings, "Resolved build settings");

    let outcome = if cli.dry_run {
        execute(DryRun::new(&settings.docker), &settings, false).await?
    } else {
        execute(DockerCli::new(&settings.docker), &settings, true).await?
    };

    report(&settings, &outcome);
    Ok(outcome.exit_code)
}

async fn execute<R: CommandRunner>(
    runner: R,
    settings: &Settings,
    show_progress: bool,
) -> ilovepdf_build::Result<BuildOutcome> {
    Orchestrator::new(runner, settings.builder.clone())
        .with_progress(show_progress)
        .run(&settings.request)
        .await
}

fn report(settings: &Settings, outcome: &BuildOutcome) {
    if !outcome.success() {
        eprintln!(
            "{} docker buildx build exited with code {}",
            "✗".red().bold(),
            outcome.exit_code
        );
        return;
    }

    let image = settings.request.image.to_string();
    match settings.request.output {
        OutputMode::Push => println!("{} Pushed {}", "✓".green().bold(), image.cyan()),
        OutputMode::Load => println!(
            "{} Loaded {} into the local image store",
            "✓".green().bold(),
            image.cyan()
        ),
    }
}

/// Map a child exit code onto this process' exit status.
fn exit_status(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_arg() {
        assert_eq!(
            parse_build_arg("PYTHON_VERSION=3.11"),
            Ok(("PYTHON_VERSION".to_string(), "3.11".to_string()))
        );
        assert_eq!(
            parse_build_arg("EMPTY="),
            Ok(("EMPTY".to_string(), String::new()))
        );
        assert_eq!(
            parse_build_arg("A=b=c"),
            Ok(("A".to_string(), "b=c".to_string()))
        );
        assert!(parse_build_arg("NOVALUE").is_err());
        assert!(parse_build_arg("=value").is_err());
    }

    #[test]
    fn test_positional_arguments() {
        let cli =
            Cli::try_parse_from(["ilovepdf-image", "ghcr.io/org/ilovepdf:v1", "push"]).unwrap();
        assert_eq!(cli.image.as_deref(), Some("ghcr.io/org/ilovepdf:v1"));
        assert_eq!(cli.push.as_deref(), Some("push"));

        let cli = Cli::try_parse_from(["ilovepdf-image"]).unwrap();
        assert!(cli.image.is_none());
        assert!(cli.push.is_none());
        assert!(!cli.native_only);
    }

    #[test]
    fn test_exit_status_mapping() {
        assert_eq!(exit_status(0), 0);
        assert_eq!(exit_status(3), 3);
        assert_eq!(exit_status(255), 255);
        assert_eq!(exit_status(-1), 1);
        assert_eq!(exit_status(300), 1);
    }
}
