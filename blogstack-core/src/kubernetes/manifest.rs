//! Typed Kubernetes manifests held in a stack graph

use crate::config::SECRET_MASK;
use crate::graph::Declaration;
use crate::stack::Redact;
use k8s_openapi::api::apps::v1::{Deployment, StatefulSet};
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, PersistentVolumeClaim, Secret, Service};
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::Serialize;

/// One object to be applied to the cluster
///
/// Serializes to the object itself, including `apiVersion` and `kind`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Manifest {
    Namespace(Namespace),
    ConfigMap(ConfigMap),
    Secret(Secret),
    PersistentVolumeClaim(PersistentVolumeClaim),
    StatefulSet(StatefulSet),
    Deployment(Deployment),
    Service(Service),
    Ingress(Ingress),
}

impl Manifest {
    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            Manifest::Namespace(o) => &o.metadata,
            Manifest::ConfigMap(o) => &o.metadata,
            Manifest::Secret(o) => &o.metadata,
            Manifest::PersistentVolumeClaim(o) => &o.metadata,
            Manifest::StatefulSet(o) => &o.metadata,
            Manifest::Deployment(o) => &o.metadata,
            Manifest::Service(o) => &o.metadata,
            Manifest::Ingress(o) => &o.metadata,
        }
    }

    pub fn name(&self) -> &str {
        self.metadata().name.as_deref().unwrap_or_default()
    }

    /// Namespace of the object; `None` for cluster-scoped objects
    pub fn namespace(&self) -> Option<&str> {
        self.metadata().namespace.as_deref()
    }
}

impl Declaration for Manifest {
    fn kind(&self) -> &'static str {
        match self {
            Manifest::Namespace(_) => "Namespace",
            Manifest::ConfigMap(_) => "ConfigMap",
            Manifest::Secret(_) => "Secret",
            Manifest::PersistentVolumeClaim(_) => "PersistentVolumeClaim",
            Manifest::StatefulSet(_) => "StatefulSet",
            Manifest::Deployment(_) => "Deployment",
            Manifest::Service(_) => "Service",
            Manifest::Ingress(_) => "Ingress",
        }
    }
}

impl Redact for Manifest {
    fn redacted(&self) -> Self {
        match self {
            Manifest::Secret(secret) => {
                let mut secret = secret.clone();
                if let Some(data) = secret.string_data.as_mut() {
                    for value in data.values_mut() {
                        *value = SECRET_MASK.to_string();
                    }
                }
                if let Some(data) = secret.data.as_mut() {
                    for value in data.values_mut() {
                        value.0 = SECRET_MASK.as_bytes().to_vec();
                    }
                }
                Manifest::Secret(secret)
            }
            other => other.clone(),
        }
    }
}
