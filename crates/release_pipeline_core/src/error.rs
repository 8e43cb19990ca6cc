use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned by a managed service call, classified by how the release
/// actions react to it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Service(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("missing property: {0}")]
    MissingProperty(String),
    #[error("malformed JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
    #[error("{0}")]
    InvalidParameters(String),
    #[error("malformed job data: {0}")]
    MalformedEvent(String),
    #[error("input artifacts must not be empty")]
    NoInputArtifacts,
    #[error("expected exactly one input artifact but got {0}")]
    UnexpectedArtifactCount(usize),
    #[error("unsupported artifact location: {0}")]
    UnsupportedArtifactLocation(String),
    #[error("malformed artifact: {0}")]
    MalformedArtifact(String),
    #[error("AWS region is not configured")]
    MissingRegion,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ReleaseError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Api(ApiError::Service(_)) | Self::MissingRegion => FailureKind::JobFailed,
            _ => FailureKind::ConfigurationError,
        }
    }
}

/// Failure type reported to CodePipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FailureKind {
    ConfigurationError,
    JobFailed,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConfigurationError => "ConfigurationError",
            Self::JobFailed => "JobFailed",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
