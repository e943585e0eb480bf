use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Builder '{name}' could not be created or found: {reason}")]
    BuilderUnavailable { name: String, reason: String },

    #[error("Build context directory not found: {0}")]
    ContextNotFound(PathBuf),

    #[error("Dockerfile not found: {0}")]
    DockerfileNotFound(PathBuf),

    #[error("Invalid platform: {0}")]
    InvalidPlatform(String),

    #[error("Invalid image tag '{tag}': {reason}")]
    InvalidTag { tag: String, reason: String },

    #[error("Invalid build configuration: {0}")]
    InvalidConfig(String),
}

impl BuildError {
    /// Multi-line message with a hint, for printing from the CLI.
    pub fn user_message(&self) -> String {
        match self {
            BuildError::Spawn { program, source } => {
                format!(
                    "Could not execute '{}': {}\n\
                     \n\
                     Make sure Docker is installed and '{} buildx version' works,\n\
                     or point --docker / ILOVEPDF_DOCKER at the right binary.",
                    program, source, program
                )
            }
            BuildError::ContextNotFound(path) => {
                format!(
                    "Build context not found: {}\n\
                     \n\
                     Run from the project root or pass --context <DIR>.",
                    path.display()
                )
            }
            BuildError::DockerfileNotFound(path) => {
                format!(
                    "Dockerfile not found: {}\n\
                     \n\
                     Check the path given with -f/--file or the `dockerfile` config entry.",
                    path.display()
                )
            }
            BuildError::InvalidPlatform(p) => {
                format!(
                    "Invalid platform '{}'\n\
                     \n\
                     Platforms look like os/arch[/variant], e.g. linux/amd64.",
                    p
                )
            }
            _ => format!("{}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;
