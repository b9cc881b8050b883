use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Tag used when a reference has no `:tag` suffix.
pub const DEFAULT_TAG: &str = "latest";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("model reference '{0}' has an empty repository name")]
    EmptyRepository(String),
    #[error("model reference '{0}' has an empty tag")]
    EmptyTag(String),
}

/// Split a reference like `repository:tag` at the first `:`.
/// If no `:` is present, the whole string is the repository with tag "latest".
pub fn parse_model_path(reference: &str) -> (&str, &str) {
    match reference.split_once(':') {
        Some((repository, tag)) => (repository, tag),
        None => (reference, DEFAULT_TAG),
    }
}

/// A model in the registry, addressed as `repository:tag`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelReference {
    pub repository: String,
    pub tag: String,
}

impl ModelReference {
    pub fn new(repository: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            tag: tag.into(),
        }
    }
}

impl FromStr for ModelReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (repository, tag) = parse_model_path(s);
        if repository.is_empty() {
            return Err(ReferenceError::EmptyRepository(s.to_owned()));
        }
        if tag.is_empty() {
            return Err(ReferenceError::EmptyTag(s.to_owned()));
        }
        Ok(Self::new(repository, tag))
    }
}

impl fmt::Display for ModelReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_tag() {
        assert_eq!(parse_model_path("llama3:8b"), ("llama3", "8b"));
    }

    #[test]
    fn parse_without_tag() {
        assert_eq!(parse_model_path("tinyllama"), ("tinyllama", "latest"));
    }

    #[test]
    fn parse_splits_at_first_colon_only() {
        assert_eq!(parse_model_path("foo:v1:extra"), ("foo", "v1:extra"));
    }

    #[test]
    fn parse_is_total() {
        assert_eq!(parse_model_path(""), ("", "latest"));
        assert_eq!(parse_model_path(":"), ("", ""));
    }

    #[test]
    fn from_str_defaults_tag() {
        let r: ModelReference = "tinyllama".parse().unwrap();
        assert_eq!(r, ModelReference::new("tinyllama", "latest"));
    }

    #[test]
    fn from_str_rejects_empty_parts() {
        assert_eq!(
            "".parse::<ModelReference>(),
            Err(ReferenceError::EmptyRepository(String::new()))
        );
        assert_eq!(
            ":v1".parse::<ModelReference>(),
            Err(ReferenceError::EmptyRepository(":v1".to_owned()))
        );
        assert_eq!(
            "foo:".parse::<ModelReference>(),
            Err(ReferenceError::EmptyTag("foo:".to_owned()))
        );
    }

    #[test]
    fn display_roundtrips() {
        let r: ModelReference = "qwen2:0.5b".parse().unwrap();
        assert_eq!(r.to_string(), "qwen2:0.5b");
        let r: ModelReference = "qwen2".parse().unwrap();
        assert_eq!(r.to_string(), "qwen2:latest");
    }
}
