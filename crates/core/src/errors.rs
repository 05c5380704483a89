use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::client::{ClientRef, ClientType};

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("client `{client}` was scored as {found:?} but the {expected:?} engine was invoked")]
    ProfileMismatch { client: ClientRef, expected: ClientType, found: ClientType },
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("batch {batch} failed after {processed} clients: {source}")]
    Batch { batch: usize, processed: usize, source: Box<PipelineError> },
    #[error("could not write snapshot `{path}`: {source}")]
    SnapshotWrite { path: PathBuf, source: std::io::Error },
    #[error("could not read snapshot `{path}`: {source}")]
    SnapshotRead { path: PathBuf, source: std::io::Error },
    #[error("malformed snapshot record in `{path}` at line {line}: {source}")]
    SnapshotDecode { path: PathBuf, line: usize, source: serde_json::Error },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_mismatch_names_both_sides() {
        let error = DomainError::ProfileMismatch {
            client: ClientRef::new("41002"),
            expected: ClientType::Individual,
            found: ClientType::Business,
        };
        let rendered = error.to_string();
        assert!(rendered.contains("41002"));
        assert!(rendered.contains("Business"));
        assert!(rendered.contains("Individual"));
    }

    #[test]
    fn batch_error_wraps_domain_error() {
        let inner = PipelineError::Domain(DomainError::InvariantViolation(
            "empty client reference".to_owned(),
        ));
        let wrapped = PipelineError::Batch { batch: 3, processed: 20, source: Box::new(inner) };
        assert!(wrapped.to_string().contains("batch 3"));
        assert!(wrapped.to_string().contains("empty client reference"));
    }
}
