// ABOUTME: Container image reference parsing and construction.
// ABOUTME: Handles formats like nginx, nginx:tag, and registry/project/module:tag.

use std::fmt;
use thiserror::Error;

use super::{ModuleId, ReleaseTag};

/// Tag alias pushed alongside every versioned image.
pub const LATEST: &str = "latest";

#[derive(Debug, Error)]
pub enum ParseImageRefError {
    #[error("image reference cannot be empty")]
    Empty,

    #[error("invalid character in image reference: {0}")]
    InvalidChar(char),

    #[error("invalid image reference format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    registry: Option<String>,
    name: String,
    tag: String,
}

impl ImageRef {
    pub fn new(registry: Option<&str>, name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            registry: registry.map(str::to_string),
            name: name.into(),
            tag: tag.into(),
        }
    }

    /// Registry reference for a module build, e.g. `gcr.io/proj/module_3:v6`.
    pub fn for_release(registry: &str, project: &str, module: &ModuleId, tag: &ReleaseTag) -> Self {
        Self {
            registry: Some(registry.to_string()),
            name: format!("{}/{}", project, module),
            tag: tag.to_string(),
        }
    }

    /// The `latest` alias of [`ImageRef::for_release`].
    pub fn latest(registry: &str, project: &str, module: &ModuleId) -> Self {
        Self {
            registry: Some(registry.to_string()),
            name: format!("{}/{}", project, module),
            tag: LATEST.to_string(),
        }
    }

    /// Local build name before registry tagging, e.g. `module_3:v6`.
    pub fn local(module: &ModuleId, tag: &ReleaseTag) -> Self {
        Self {
            registry: None,
            name: module.to_string(),
            tag: tag.to_string(),
        }
    }

    pub fn parse(input: &str) -> Result<Self, ParseImageRefError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseImageRefError::Empty);
        }

        for c in input.chars() {
            if !c.is_ascii_alphanumeric() && !matches!(c, '/' | ':' | '.' | '-' | '_') {
                return Err(ParseImageRefError::InvalidChar(c));
            }
        }

        // A colon followed by a slash belongs to a registry port, not a tag
        let (without_tag, tag) = match input.rsplit_once(':') {
            Some((before, after)) if !after.contains('/') => (before, after.to_string()),
            _ => (input, LATEST.to_string()),
        };

        if tag.is_empty() {
            return Err(ParseImageRefError::InvalidFormat(input.to_string()));
        }

        let (registry, name) = match without_tag.split_once('/') {
            Some((first, rest))
                if first.contains('.') || first.contains(':') || first == "localhost" =>
            {
                (Some(first.to_string()), rest.to_string())
            }
            _ => (None, without_tag.to_string()),
        };

        if name.is_empty() || name.starts_with('/') || name.ends_with('/') {
            return Err(ParseImageRefError::InvalidFormat(input.to_string()));
        }

        Ok(Self {
            registry,
            name,
            tag,
        })
    }

    pub fn registry(&self) -> Option<&str> {
        self.registry.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Repository part without the tag, as the engine's tag/push APIs expect.
    pub fn repository(&self) -> String {
        match &self.registry {
            Some(registry) => format!("{}/{}", registry, self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository(), self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_reference_layout() {
        let module = ModuleId::parse("module_3").unwrap();
        let tag = ReleaseTag::new(6);
        let image = ImageRef::for_release("gcr.io", "insights", &module, &tag);
        assert_eq!(image.to_string(), "gcr.io/insights/module_3:v6");
        assert_eq!(image.repository(), "gcr.io/insights/module_3");

        let latest = ImageRef::latest("gcr.io", "insights", &module);
        assert_eq!(latest.to_string(), "gcr.io/insights/module_3:latest");
    }

    #[test]
    fn local_reference_has_no_registry() {
        let module = ModuleId::parse("module_1").unwrap();
        let image = ImageRef::local(&module, &ReleaseTag::new(2));
        assert!(image.registry().is_none());
        assert_eq!(image.to_string(), "module_1:v2");
    }

    #[test]
    fn parse_defaults_to_latest() {
        let image = ImageRef::parse("cozero/linter-python3-pylint").unwrap();
        assert_eq!(image.tag(), "latest");
        assert!(image.registry().is_none());
    }

    #[test]
    fn parse_registry_with_port() {
        let image = ImageRef::parse("localhost:5000/team/app").unwrap();
        assert_eq!(image.registry(), Some("localhost:5000"));
        assert_eq!(image.name(), "team/app");
        assert_eq!(image.tag(), "latest");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(ImageRef::parse(""), Err(ParseImageRefError::Empty)));
        assert!(matches!(
            ImageRef::parse("bad image"),
            Err(ParseImageRefError::InvalidChar(' '))
        ));
        assert!(ImageRef::parse("app:").is_err());
    }
}
