//! Image reference handling
//!
//! The reference is passed to `docker buildx build -t` as-is. Tag checks
//! only produce warnings.

use crate::error::{BuildError, Result};
use std::fmt;

/// Image built when no reference is given on the command line.
pub const DEFAULT_IMAGE: &str = "ilovepdf:latest";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference(String);

impl ImageReference {
    /// Accepts any string, including ones docker will later reject.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Tag part, `latest` when the reference carries none.
    pub fn tag(&self) -> &str {
        split_image_tag(&self.0).1
    }

    /// Check the tag against docker's tag grammar.
    ///
    /// - at most 128 characters
    /// - only ASCII alphanumerics, `.`, `-` and `_`
    /// - must not start with `.` or `-`
    pub fn validate_tag(&self) -> Result<()> {
        let tag = self.tag();
        let invalid = |reason: String| BuildError::InvalidTag {
            tag: tag.to_string(),
            reason,
        };

        if tag.is_empty() {
            return Err(invalid("tag is empty".to_string()));
        }

        if tag.len() > 128 {
            return Err(invalid(format!(
                "{} characters, max 128",
                tag.len()
            )));
        }

        if tag.starts_with('.') || tag.starts_with('-') {
            return Err(invalid("must not start with '.' or '-'".to_string()));
        }

        if let Some(c) = tag
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '.' && *c != '-' && *c != '_')
        {
            return Err(invalid(format!("invalid character '{}'", c)));
        }

        Ok(())
    }
}

impl Default for ImageReference {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageReference {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ImageReference {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Split an image reference into repository and tag.
///
/// # Examples
/// - `ghcr.io/org/ilovepdf:v1.0` -> `("ghcr.io/org/ilovepdf", "v1.0")`
/// - `ilovepdf` -> `("ilovepdf", "latest")`
/// - `localhost:5000/ilovepdf` -> `("localhost:5000/ilovepdf", "latest")`
pub fn split_image_tag(image: &str) -> (&str, &str) {
    // Digest references keep everything before '@'
    let image_part = image.split('@').next().unwrap_or(image);

    if let Some(pos) = image_part.rfind(':') {
        let potential_tag = &image_part[pos + 1..];
        // A registry port is followed by a path segment: localhost:5000/app
        if !potential_tag.contains('/') {
            return (&image_part[..pos], potential_tag);
        }
    }

    (image_part, "latest")
}
