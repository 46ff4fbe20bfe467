//! Kubernetes workload manifests
//!
//! Builds StatefulSets and Deployments from a shared pod container template.

pub mod deployments;
pub mod statefulsets;

pub use deployments::{build_deployment, DeploymentRequest};
pub use statefulsets::{build_statefulset, StatefulSetRequest};

use k8s_openapi::api::core::v1::{
    ConfigMapKeySelector, Container, ContainerPort, EnvVar, EnvVarSource, SecretKeySelector,
    VolumeMount,
};

/// Single container of a pod template
#[derive(Debug, Clone, Default)]
pub struct ContainerTemplate {
    pub name: String,
    pub image: String,
    pub ports: Vec<i32>,
    pub env: Vec<EnvVar>,
    /// (volume name, mount path)
    pub volume_mounts: Vec<(String, String)>,
}

impl ContainerTemplate {
    pub fn to_container(&self) -> Container {
        Container {
            name: self.name.clone(),
            image: Some(self.image.clone()),
            ports: if self.ports.is_empty() {
                None
            } else {
                Some(
                    self.ports
                        .iter()
                        .map(|p| ContainerPort {
                            container_port: *p,
                            ..Default::default()
                        })
                        .collect(),
                )
            },
            env: if self.env.is_empty() {
                None
            } else {
                Some(self.env.clone())
            },
            volume_mounts: if self.volume_mounts.is_empty() {
                None
            } else {
                Some(
                    self.volume_mounts
                        .iter()
                        .map(|(name, path)| VolumeMount {
                            name: name.clone(),
                            mount_path: path.clone(),
                            ..Default::default()
                        })
                        .collect(),
                )
            },
            ..Default::default()
        }
    }
}

/// Literal environment variable
pub fn env_value(name: &str, value: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: Some(value.to_string()),
        value_from: None,
    }
}

/// Environment variable read from a Secret key
pub fn env_from_secret(name: &str, secret: &str, key: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: None,
        value_from: Some(EnvVarSource {
            secret_key_ref: Some(SecretKeySelector {
                name: secret.to_string(),
                key: key.to_string(),
                optional: None,
            }),
            ..Default::default()
        }),
    }
}

/// Environment variable read from a ConfigMap key
pub fn env_from_config_map(name: &str, config_map: &str, key: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: None,
        value_from: Some(EnvVarSource {
            config_map_key_ref: Some(ConfigMapKeySelector {
                name: config_map.to_string(),
                key: key.to_string(),
                optional: None,
            }),
            ..Default::default()
        }),
    }
}
