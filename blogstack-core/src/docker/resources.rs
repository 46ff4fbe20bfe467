//! Docker resource declarations
//!
//! Plain data describing images, networks, volumes and containers, plus the
//! conversion of a container declaration into the engine's create request.

use crate::config::SECRET_MASK;
use crate::graph::Declaration;
use crate::stack::Redact;
use bollard::container::{Config, NetworkingConfig};
use bollard::models::{EndpointSettings, HostConfig, Mount, MountTypeEnum, PortBinding};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DockerResource {
    Image(ImageSpec),
    Network(NetworkSpec),
    Volume(VolumeSpec),
    Container(ContainerSpec),
}

impl DockerResource {
    /// Engine-side name of the resource
    pub fn name(&self) -> &str {
        match self {
            DockerResource::Image(i) => &i.name,
            DockerResource::Network(n) => &n.name,
            DockerResource::Volume(v) => &v.name,
            DockerResource::Container(c) => &c.name,
        }
    }
}

impl Declaration for DockerResource {
    fn kind(&self) -> &'static str {
        match self {
            DockerResource::Image(_) => "image",
            DockerResource::Network(_) => "network",
            DockerResource::Volume(_) => "volume",
            DockerResource::Container(_) => "container",
        }
    }
}

impl Redact for DockerResource {
    fn redacted(&self) -> Self {
        match self {
            DockerResource::Container(c) => DockerResource::Container(c.redacted()),
            other => other.clone(),
        }
    }
}

/// Remote image, pulled by reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSpec {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkSpec {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeSpec {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortMapping {
    pub internal: u16,
    pub external: u16,
}

impl PortMapping {
    fn container_port(&self) -> String {
        format!("{}/tcp", self.internal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeMount {
    pub container_path: String,
    pub volume_name: String,
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
}

impl EnvVar {
    pub fn plain(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            sensitive: false,
        }
    }

    pub fn sensitive(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            sensitive: true,
        }
    }

    /// `NAME=value` form used by the engine
    pub fn to_assignment(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

impl std::fmt::Debug for EnvVar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value: &str = if self.sensitive { SECRET_MASK } else { &self.value };
        f.debug_struct("EnvVar")
            .field("name", &self.name)
            .field("value", &value)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerSpec {
    pub name: String,
    /// Image reference; replaced by the pulled image id at apply time
    pub image: String,
    pub networks: Vec<String>,
    pub ports: Vec<PortMapping>,
    pub envs: Vec<EnvVar>,
    pub volumes: Vec<VolumeMount>,
}

impl ContainerSpec {
    fn redacted(&self) -> Self {
        let mut spec = self.clone();
        for env in spec.envs.iter_mut().filter(|e| e.sensitive) {
            env.value = SECRET_MASK.to_string();
        }
        spec
    }

    /// Build the engine create request, running `image` (a reference or id)
    pub fn to_create_config(&self, image: &str) -> Config<String> {
        let exposed_ports: HashMap<String, HashMap<(), ()>> = self
            .ports
            .iter()
            .map(|p| (p.container_port(), HashMap::new()))
            .collect();

        let port_bindings: HashMap<String, Option<Vec<PortBinding>>> = self
            .ports
            .iter()
            .map(|p| {
                (
                    p.container_port(),
                    Some(vec![PortBinding {
                        host_ip: None,
                        host_port: Some(p.external.to_string()),
                    }]),
                )
            })
            .collect();

        let mounts: Vec<Mount> = self
            .volumes
            .iter()
            .map(|v| Mount {
                target: Some(v.container_path.clone()),
                source: Some(v.volume_name.clone()),
                typ: Some(MountTypeEnum::VOLUME),
                ..Default::default()
            })
            .collect();

        let endpoints_config: HashMap<String, EndpointSettings> = self
            .networks
            .iter()
            .map(|n| (n.clone(), EndpointSettings::default()))
            .collect();

        Config {
            image: Some(image.to_string()),
            env: Some(self.envs.iter().map(EnvVar::to_assignment).collect()),
            exposed_ports: Some(exposed_ports),
            host_config: Some(HostConfig {
                port_bindings: Some(port_bindings),
                mounts: Some(mounts),
                network_mode: self.networks.first().cloned(),
                ..Default::default()
            }),
            networking_config: Some(NetworkingConfig { endpoints_config }),
            ..Default::default()
        }
    }
}
