//! Kubernetes error types
//!
//! Maps kube-rs API failures onto typed variants by HTTP status code.

use crate::graph::GraphError;
use thiserror::Error;

/// Kubernetes-specific errors
#[derive(Debug, Error)]
pub enum K8sError {
    /// Kubernetes resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid kubeconfig or cluster connection settings
    #[error("Invalid kubeconfig: {0}")]
    InvalidKubeconfig(String),

    /// Credentials rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource conflict
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Object rejected by API validation
    #[error("Invalid object: {0}")]
    Invalid(String),

    /// Any other kube-rs client error
    #[error("Kubernetes API error: {0}")]
    Kube(#[source] kube::Error),

    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Internal system error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<kube::Error> for K8sError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(resp) => match resp.code {
                401 => K8sError::Unauthorized(resp.message),
                403 => K8sError::Forbidden(resp.message),
                404 => K8sError::NotFound(resp.message),
                409 => K8sError::Conflict(resp.message),
                422 => K8sError::Invalid(resp.message),
                _ => K8sError::Kube(kube::Error::Api(resp)),
            },
            other => K8sError::Kube(other),
        }
    }
}

/// Result type alias for Kubernetes operations
pub type K8sResult<T> = std::result::Result<T, K8sError>;
