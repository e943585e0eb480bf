use crate::error::{BuildError, Result};
use crate::image::ImageReference;
use crate::platform::Platform;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The only push flag value that selects a registry push.
pub const PUSH_FLAG: &str = "push";

/// Where the build result goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Load into the local image store (buildx keeps the host-native image).
    Load,
    /// Push every platform image plus the manifest list to the registry.
    Push,
}

impl OutputMode {
    /// `Push` only for the exact string `push`; anything else loads locally.
    pub fn from_push_flag(flag: Option<&str>) -> Self {
        match flag {
            Some(PUSH_FLAG) => OutputMode::Push,
            _ => OutputMode::Load,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub image: ImageReference,
    pub platforms: Vec<Platform>,
    pub output: OutputMode,
    pub dockerfile: Option<PathBuf>,
    pub context: PathBuf,
    pub build_args: BTreeMap<String, String>,
    pub no_cache: bool,
    /// Build only the host-native platform when loading.
    pub native_only: bool,
}

impl BuildRequest {
    pub fn new(image: ImageReference, output: OutputMode) -> Self {
        Self {
            image,
            platforms: Platform::defaults(),
            output,
            dockerfile: None,
            context: PathBuf::from("."),
            build_args: BTreeMap::new(),
            no_cache: false,
            native_only: false,
        }
    }

    /// Check the parts of the request docker would otherwise reject late.
    pub fn validate(&self) -> Result<()> {
        if self.platforms.is_empty() {
            return Err(BuildError::InvalidConfig(
                "at least one platform is required".to_string(),
            ));
        }

        if !self.context.exists() {
            return Err(BuildError::ContextNotFound(self.context.clone()));
        }

        if !self.context.is_dir() {
            return Err(BuildError::InvalidConfig(format!(
                "Build context is not a directory: {}",
                self.context.display()
            )));
        }

        if let Some(dockerfile) = &self.dockerfile
            && !dockerfile.is_file()
        {
            return Err(BuildError::DockerfileNotFound(dockerfile.clone()));
        }

        Ok(())
    }

    /// Platforms passed to `--platform` for this request.
    ///
    /// Every requested platform is built for both output modes. With
    /// `native_only`, a load is narrowed to the native platform when that one
    /// was requested.
    pub fn effective_platforms(&self, native: Option<&Platform>) -> Vec<Platform> {
        match (self.output, native) {
            (OutputMode::Load, Some(native))
                if self.native_only && self.platforms.contains(native) =>
            {
                vec![native.clone()]
            }
            _ => self.platforms.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_push_flag_exact_match() {
        assert_eq!(OutputMode::from_push_flag(Some("push")), OutputMode::Push);
        assert_eq!(OutputMode::from_push_flag(None), OutputMode::Load);
        assert_eq!(OutputMode::from_push_flag(Some("")), OutputMode::Load);
        assert_eq!(OutputMode::from_push_flag(Some("PUSH")), OutputMode::Load);
        assert_eq!(OutputMode::from_push_flag(Some("push ")), OutputMode::Load);
        assert_eq!(OutputMode::from_push_flag(Some("--push")), OutputMode::Load);
    }

    #[test]
    fn test_new_uses_default_platforms() {
        let req = BuildRequest::new(ImageReference::default(), OutputMode::Load);
        assert_eq!(req.platforms, Platform::defaults());
        assert_eq!(req.context, PathBuf::from("."));
    }

    #[test]
    fn test_effective_platforms_load_builds_every_platform() {
        let req = BuildRequest::new(ImageReference::default(), OutputMode::Load);
        let arm: Platform = "linux/arm64".parse().unwrap();
        assert!(!req.native_only);
        assert_eq!(req.effective_platforms(Some(&arm)), Platform::defaults());
    }

    #[test]
    fn test_effective_platforms_native_only_narrows_load() {
        let mut req = BuildRequest::new(ImageReference::default(), OutputMode::Load);
        req.native_only = true;
        let arm: Platform = "linux/arm64".parse().unwrap();
        assert_eq!(req.effective_platforms(Some(&arm)), vec![arm]);
    }

    #[test]
    fn test_effective_platforms_native_only_unknown_native_keeps_all() {
        let mut req = BuildRequest::new(ImageReference::default(), OutputMode::Load);
        req.native_only = true;
        let riscv: Platform = "linux/riscv64".parse().unwrap();
        assert_eq!(req.effective_platforms(Some(&riscv)), Platform::defaults());
        assert_eq!(req.effective_platforms(None), Platform::defaults());
    }

    #[test]
    fn test_effective_platforms_push_keeps_all() {
        let mut req = BuildRequest::new(ImageReference::default(), OutputMode::Push);
        req.native_only = true;
        let amd: Platform = "linux/amd64".parse().unwrap();
        assert_eq!(req.effective_platforms(Some(&amd)), Platform::defaults());
    }

    #[test]
    fn test_validate_missing_context() {
        let mut req = BuildRequest::new(ImageReference::default(), OutputMode::Load);
        req.context = PathBuf::from("/nonexistent/ilovepdf/context");
        assert!(matches!(
            req.validate(),
            Err(BuildError::ContextNotFound(_))
        ));
    }

    #[test]
    fn test_validate_missing_dockerfile() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path();
        let mut req = BuildRequest::new(ImageReference::default(), OutputMode::Load);
        req.context = dir.to_path_buf();
        req.dockerfile = Some(dir.join("Dockerfile.missing"));
        assert!(matches!(
            req.validate(),
            Err(BuildError::DockerfileNotFound(_))
        ));

        std::fs::write(dir.join("Dockerfile"), "FROM python:3.11-slim\n").unwrap();
        req.dockerfile = Some(dir.join("Dockerfile"));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_platforms() {
        let mut req = BuildRequest::new(ImageReference::default(), OutputMode::Push);
        req.platforms.clear();
        assert!(matches!(req.validate(), Err(BuildError::InvalidConfig(_))));
    }
}
