//! Multi-platform image builds for the ilovepdf container
//!
//! This crate wraps `docker buildx`: it prepares a named builder instance and
//! builds the image for several platforms, either pushing the result to a
//! registry or loading the host-native image locally.

pub mod builder;
pub mod error;
pub mod image;
pub mod orchestrator;
pub mod platform;
pub mod progress;
pub mod request;
pub mod runner;

pub use builder::{BuilderContext, BuilderState, DEFAULT_BUILDER};
pub use error::{BuildError, Result};
pub use image::{DEFAULT_IMAGE, ImageReference, split_image_tag};
pub use orchestrator::{BuildOutcome, Orchestrator, build_command};
pub use platform::Platform;
pub use progress::BuildProgress;
pub use request::{BuildRequest, OutputMode, PUSH_FLAG};
pub use runner::{CommandOutput, CommandRunner, DockerCli, DryRun};
