//! Kubernetes client wrapper
//!
//! Wraps the kube-rs Client with the API server it talks to.

use super::error::{K8sError, K8sResult};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::Path;

/// Wrapper around kube-rs Client with cluster context
#[derive(Clone)]
pub struct K8sClient {
    inner: Client,
    api_server: String,
}

impl K8sClient {
    fn from_config(config: Config) -> K8sResult<Self> {
        let api_server = config.cluster_url.to_string();
        let inner = Client::try_from(config)
            .map_err(|e| K8sError::InvalidKubeconfig(format!("Failed to create client: {}", e)))?;

        Ok(Self { inner, api_server })
    }

    /// Wrap an already built kube-rs client
    pub fn with_client(inner: Client, api_server: impl Into<String>) -> Self {
        Self {
            inner,
            api_server: api_server.into(),
        }
    }

    /// Client from `$KUBECONFIG`, `~/.kube/config` or the in-cluster environment
    pub async fn from_default(context: Option<&str>) -> K8sResult<Self> {
        let config = match context {
            Some(context) => Config::from_kubeconfig(&KubeConfigOptions {
                context: Some(context.to_string()),
                ..Default::default()
            })
            .await
            .map_err(|e| K8sError::InvalidKubeconfig(format!("Failed to load kubeconfig: {}", e)))?,
            None => Config::infer()
                .await
                .map_err(|e| K8sError::InvalidKubeconfig(format!("Failed to infer config: {}", e)))?,
        };

        Self::from_config(config)
    }

    /// Client from an explicit kubeconfig file with optional context
    pub async fn from_kubeconfig_file(path: &Path, context: Option<&str>) -> K8sResult<Self> {
        let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
            K8sError::InvalidKubeconfig(format!(
                "Failed to read kubeconfig {}: {}",
                path.display(),
                e
            ))
        })?;

        let config = Config::from_custom_kubeconfig(
            kubeconfig,
            &KubeConfigOptions {
                context: context.map(String::from),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| K8sError::InvalidKubeconfig(format!("Failed to create config: {}", e)))?;

        Self::from_config(config)
    }

    /// Client from in-cluster configuration (for running inside K8s)
    pub fn from_incluster() -> K8sResult<Self> {
        let config = Config::incluster().map_err(|e| {
            K8sError::InvalidKubeconfig(format!("Failed to get in-cluster config: {}", e))
        })?;

        Self::from_config(config)
    }

    /// Get the inner kube-rs Client
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Get API server URL
    pub fn api_server(&self) -> &str {
        &self.api_server
    }

    /// Fetch the server's git version, failing if the cluster is unreachable
    pub async fn server_version(&self) -> K8sResult<String> {
        let version = self.inner.apiserver_version().await?;
        Ok(version.git_version)
    }
}

impl std::fmt::Debug for K8sClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("K8sClient")
            .field("api_server", &self.api_server)
            .finish()
    }
}
