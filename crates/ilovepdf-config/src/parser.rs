//! image-build.kdl parser
//!
//! ```kdl
//! image "ghcr.io/org/ilovepdf:latest"
//! builder "multiarch"
//! platforms "linux/amd64" "linux/arm64"
//! dockerfile "Dockerfile"
//! context "."
//! build-args {
//!     PYTHON_VERSION "3.11"
//! }
//! no-cache #false
//! native-only #false
//! docker "docker"
//! ```

use crate::error::{ConfigError, Result};
use kdl::{KdlDocument, KdlNode};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Values read from an image-build config file. Absent nodes stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageBuildConfig {
    pub image: Option<String>,
    pub builder: Option<String>,
    pub platforms: Option<Vec<String>>,
    pub dockerfile: Option<PathBuf>,
    pub context: Option<PathBuf>,
    pub build_args: BTreeMap<String, String>,
    pub no_cache: Option<bool>,
    pub native_only: Option<bool>,
    pub docker: Option<String>,
}

impl ImageBuildConfig {
    /// Resolve relative `dockerfile` / `context` paths against `base`.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        self.dockerfile = self.dockerfile.map(|p| base.join(p));
        self.context = self.context.map(|p| base.join(p));
        self
    }
}

/// Parse a config file; relative paths are resolved against its directory.
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<ImageBuildConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let config = parse_config_str(&content).map_err(|e| match e {
        ConfigError::Parse { source, .. } => ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(config.resolve_paths(base))
}

pub fn parse_config_str(content: &str) -> Result<ImageBuildConfig> {
    let doc: KdlDocument = content.parse().map_err(|source| ConfigError::Parse {
        path: PathBuf::from("<string>"),
        source,
    })?;

    let mut config = ImageBuildConfig::default();

    for node in doc.nodes() {
        match node.name().value() {
            "image" => config.image = Some(first_string(node)?),
            "builder" => config.builder = Some(first_string(node)?),
            "platforms" => {
                let platforms = string_args(node)?;
                if platforms.is_empty() {
                    return Err(invalid(node, "at least one platform is required"));
                }
                config.platforms = Some(platforms);
            }
            "dockerfile" => config.dockerfile = Some(PathBuf::from(first_string(node)?)),
            "context" => config.context = Some(PathBuf::from(first_string(node)?)),
            "build-args" => {
                if let Some(args) = node.children() {
                    for arg in args.nodes() {
                        let key = arg.name().value().to_string();
                        let value = first_string(arg)?;
                        config.build_args.insert(key, value);
                    }
                }
            }
            "no-cache" => config.no_cache = Some(flag(node)?),
            "native-only" => config.native_only = Some(flag(node)?),
            "docker" => config.docker = Some(first_string(node)?),
            other => {
                tracing::debug!("Ignoring unknown config node '{}'", other);
            }
        }
    }

    Ok(config)
}

fn first_string(node: &KdlNode) -> Result<String> {
    node.entries()
        .first()
        .and_then(|e| e.value().as_string())
        .map(str::to_string)
        .ok_or_else(|| invalid(node, "expected a string argument"))
}

/// A bare flag node means `#true`.
fn flag(node: &KdlNode) -> Result<bool> {
    node.entries()
        .first()
        .map(|e| e.value().as_bool())
        .unwrap_or(Some(true))
        .ok_or_else(|| invalid(node, "expected #true or #false"))
}

fn string_args(node: &KdlNode) -> Result<Vec<String>> {
    node.entries()
        .iter()
        .filter(|e| e.name().is_none())
        .map(|e| {
            e.value()
                .as_string()
                .map(str::to_string)
                .ok_or_else(|| invalid(node, "expected string arguments"))
        })
        .collect()
}

fn invalid(node: &KdlNode, message: &str) -> ConfigError {
    ConfigError::Invalid {
        key: node.name().value().to_string(),
        message: message.to_string(),
    }
}
