//! Docker error types

use crate::graph::GraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DockerError {
    /// Engine socket could not be reached
    #[error("Docker engine unavailable: {0}")]
    Connection(String),

    /// Pull finished but the engine reports no image id
    #[error("Image {0} has no id after pull")]
    MissingImageId(String),

    #[error("Docker engine error: {0}")]
    Engine(#[from] bollard::errors::Error),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type DockerResult<T> = std::result::Result<T, DockerError>;

/// True when the engine answered 404
pub fn is_not_found(err: &bollard::errors::Error) -> bool {
    matches!(
        err,
        bollard::errors::Error::DockerResponseServerError {
            status_code: 404,
            ..
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found() {
        let missing = bollard::errors::Error::DockerResponseServerError {
            status_code: 404,
            message: "No such container: db_service".into(),
        };
        let conflict = bollard::errors::Error::DockerResponseServerError {
            status_code: 409,
            message: "Conflict".into(),
        };

        assert!(is_not_found(&missing));
        assert!(!is_not_found(&conflict));
    }
}
