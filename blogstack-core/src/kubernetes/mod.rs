//! Kubernetes integration for Blogstack
//!
//! - Manifest builders (Namespaces, ConfigMaps, Secrets, PVCs, StatefulSets,
//!   Deployments, Services, Ingresses)
//! - Cluster connection via kubeconfig or in-cluster config
//! - Server-side apply and deletion of a manifest graph

pub mod apply;
pub mod client;
pub mod config_storage;
pub mod error;
pub mod manifest;
pub mod namespaces;
pub mod networking;
pub mod workloads;

pub use apply::{KubeDeployer, FIELD_MANAGER};
pub use client::K8sClient;
pub use error::{K8sError, K8sResult};
pub use manifest::Manifest;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

/// Metadata for a named, optionally namespaced object
pub(crate) fn object_meta(
    name: &str,
    namespace: Option<&str>,
    labels: Option<&BTreeMap<String, String>>,
) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: namespace.map(String::from),
        labels: labels.filter(|l| !l.is_empty()).cloned(),
        ..Default::default()
    }
}

/// `{ app: <name> }` label set
pub fn app_labels(app: &str) -> BTreeMap<String, String> {
    BTreeMap::from([("app".to_string(), app.to_string())])
}
