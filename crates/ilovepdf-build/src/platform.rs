use crate::error::{BuildError, Result};
use std::fmt;
use std::str::FromStr;

/// Target platform in `os/arch[/variant]` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform(String);

impl Platform {
    pub const LINUX_AMD64: &'static str = "linux/amd64";
    pub const LINUX_ARM64: &'static str = "linux/arm64";

    /// The platforms the image is published for.
    pub fn defaults() -> Vec<Platform> {
        vec![
            Platform(Self::LINUX_AMD64.to_string()),
            Platform(Self::LINUX_ARM64.to_string()),
        ]
    }

    /// Platform of the machine running this process, if it maps to a linux target.
    pub fn native() -> Option<Platform> {
        Self::for_arch(std::env::consts::ARCH)
    }

    fn for_arch(arch: &str) -> Option<Platform> {
        let platform = match arch {
            "x86_64" => Self::LINUX_AMD64,
            "aarch64" => Self::LINUX_ARM64,
            "arm" => "linux/arm/v7",
            _ => return None,
        };
        Some(Platform(platform.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render a `--platform` value.
    pub fn join(platforms: &[Platform]) -> String {
        platforms
            .iter()
            .map(Platform::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromStr for Platform {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let mut parts = s.split('/');
        let os = parts.next().unwrap_or("");
        let arch = parts.next().unwrap_or("");
        let variant = parts.next();

        if os.is_empty() || arch.is_empty() || variant == Some("") || parts.next().is_some() {
            return Err(BuildError::InvalidPlatform(s.to_string()));
        }

        Ok(Platform(s.to_string()))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
