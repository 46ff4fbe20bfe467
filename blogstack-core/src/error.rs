//! Top-level error type
//!
//! Aggregates the per-module errors so callers driving a whole stack can
//! use a single `?` chain.

use crate::config::ConfigError;
use crate::docker::error::DockerError;
use crate::graph::GraphError;
use crate::kubernetes::error::K8sError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StackError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Docker(#[from] DockerError),

    #[error(transparent)]
    Kubernetes(#[from] K8sError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_yaml::Error> for StackError {
    fn from(err: serde_yaml::Error) -> Self {
        StackError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for StackError {
    fn from(err: serde_json::Error) -> Self {
        StackError::Serialization(err.to_string())
    }
}

pub type StackResult<T> = std::result::Result<T, StackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_errors_keep_their_message() {
        let err: StackError = ConfigError::Missing {
            key: "blogs:POSTGRES_DB".to_string(),
        }
        .into();
        assert!(matches!(err, StackError::Config(_)));
        assert!(err.to_string().contains("blogs:POSTGRES_DB"));

        let err: StackError = GraphError::Cycle(vec!["a".into(), "b".into()]).into();
        assert!(matches!(err, StackError::Graph(_)));
    }

    #[test]
    fn test_serialization_error() {
        let err: StackError = serde_yaml::from_str::<Vec<u8>>("{").unwrap_err().into();
        assert!(matches!(err, StackError::Serialization(_)));
    }
}
