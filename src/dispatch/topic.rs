//! Topic identifiers taken from the request path.

/// Client-side routing faults.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoutingError {
    #[error("missing topic")]
    MissingTopic,

    /// The path segment did not decode to a UTF-8 topic name.
    #[error("invalid topic {segment}: {reason}")]
    InvalidTopic { segment: String, reason: String },
}

/// Non-empty topic name, used verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic(String);

impl Topic {
    /// Accept any non-empty path segment.
    pub fn parse(raw: Option<String>) -> Result<Self, RoutingError> {
        match raw {
            Some(name) if !name.is_empty() => Ok(Self(name)),
            _ => Err(RoutingError::MissingTopic),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
