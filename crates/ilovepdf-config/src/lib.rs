pub mod error;
pub mod parser;

pub use error::*;
pub use parser::{ImageBuildConfig, parse_config_file, parse_config_str};

use std::path::PathBuf;

/// Environment variable holding a direct path to the config file.
pub const CONFIG_PATH_ENV: &str = "ILOVEPDF_BUILD_CONFIG";

const CANDIDATES: [&str; 4] = [
    "image-build.local.kdl",
    ".image-build.local.kdl",
    "image-build.kdl",
    ".image-build.kdl",
];

/// Per-user configuration directory (`<config dir>/ilovepdf`).
pub fn get_config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("ilovepdf"))
}

/// Locate the image-build config file.
///
/// Search order:
/// 1. `ILOVEPDF_BUILD_CONFIG` (direct path; it must exist)
/// 2. current directory: image-build.local.kdl, .image-build.local.kdl,
///    image-build.kdl, .image-build.kdl
/// 3. `<config dir>/ilovepdf/image-build.kdl`
pub fn find_config_file() -> Result<PathBuf> {
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.is_file() {
            return Ok(path);
        }
        return Err(ConfigError::Missing(path));
    }

    let current_dir = std::env::current_dir()?;
    for filename in &CANDIDATES {
        let path = current_dir.join(filename);
        if path.is_file() {
            return Ok(path);
        }
    }

    if let Ok(config_dir) = get_config_dir() {
        let global_config = config_dir.join("image-build.kdl");
        if global_config.is_file() {
            return Ok(global_config);
        }
    }

    Err(ConfigError::ConfigFileNotFound)
}

/// Load the config file given explicitly, or the discovered one.
///
/// Returns `None` when no explicit path was given and nothing was found.
pub fn load_config(explicit: Option<PathBuf>) -> Result<Option<(PathBuf, ImageBuildConfig)>> {
    let path = match explicit {
        Some(path) if path.is_file() => path,
        Some(path) => return Err(ConfigError::Missing(path)),
        None => match find_config_file() {
            Ok(path) => path,
            Err(ConfigError::ConfigFileNotFound) => {
                tracing::debug!("No image-build config file found, using defaults");
                return Ok(None);
            }
            Err(e) => return Err(e),
        },
    };

    tracing::debug!(config = %path.display(), "Loading image-build config");
    let config = parse_config_file(&path)?;
    Ok(Some((path, config)))
}
