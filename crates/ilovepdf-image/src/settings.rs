//! Merge command-line arguments, the config file and built-in defaults.
//!
//! Priority: CLI > config file > default.

use crate::Cli;
use ilovepdf_build::{
    BuildRequest, BuilderContext, DEFAULT_BUILDER, DEFAULT_IMAGE, ImageReference, OutputMode,
    Platform,
};
use ilovepdf_config::ImageBuildConfig;
use std::path::PathBuf;

const DEFAULT_DOCKER: &str = "docker";

#[derive(Debug)]
pub struct Settings {
    pub request: BuildRequest,
    pub builder: BuilderContext,
    pub docker: String,
}

impl Settings {
    pub fn resolve(cli: &Cli, config: Option<ImageBuildConfig>) -> ilovepdf_build::Result<Self> {
        let config = config.unwrap_or_default();

        let image = cli
            .image
            .clone()
            .or(config.image)
            .unwrap_or_else(|| DEFAULT_IMAGE.to_string());

        let output = OutputMode::from_push_flag(cli.push.as_deref());

        let mut request = BuildRequest::new(ImageReference::new(image), output);

        let platform_names = if !cli.platforms.is_empty() {
            Some(cli.platforms.clone())
        } else {
            config.platforms
        };
        if let Some(names) = platform_names {
            request.platforms = names
                .iter()
                .map(|name| name.parse::<Platform>())
                .collect::<ilovepdf_build::Result<Vec<_>>>()?;
        }

        request.dockerfile = cli.dockerfile.clone().or(config.dockerfile);
        request.context = cli
            .context
            .clone()
            .or(config.context)
            .unwrap_or_else(|| PathBuf::from("."));

        request.build_args = config.build_args;
        for (key, value) in &cli.build_args {
            request.build_args.insert(key.clone(), value.clone());
        }

        request.no_cache = cli.no_cache || config.no_cache.unwrap_or(false);
        request.native_only = cli.native_only || config.native_only.unwrap_or(false);

        let builder = BuilderContext::new(
            cli.builder
                .clone()
                .or(config.builder)
                .unwrap_or_else(|| DEFAULT_BUILDER.to_string()),
        );

        let docker = cli
            .docker
            .clone()
            .or(config.docker)
            .unwrap_or_else(|| DEFAULT_DOCKER.to_string());

        Ok(Self {
            request,
            builder,
            docker,
        })
    }
}
