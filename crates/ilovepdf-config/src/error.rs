use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found")]
    ConfigDirNotFound,

    #[error(
        "No image-build config file found. Looked for:\n\
        - current directory: image-build.local.kdl, .image-build.local.kdl, image-build.kdl, .image-build.kdl\n\
        - <config dir>/ilovepdf/image-build.kdl\n\
        A path can also be given with the ILOVEPDF_BUILD_CONFIG environment variable"
    )]
    ConfigFileNotFound,

    #[error("Config file does not exist: {0}")]
    Missing(PathBuf),

    #[error("KDL parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: kdl::KdlError,
    },

    #[error("Invalid config value for '{key}': {message}")]
    Invalid { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
