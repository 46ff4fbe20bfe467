//! Deployment manifests

use super::ContainerTemplate;
use crate::kubernetes::object_meta;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct DeploymentRequest {
    pub name: String,
    pub namespace: String,
    pub replicas: i32,
    pub labels: BTreeMap<String, String>,
    pub container: ContainerTemplate,
}

/// Build a Deployment whose selector and pod labels are `request.labels`
pub fn build_deployment(request: &DeploymentRequest) -> Deployment {
    Deployment {
        metadata: object_meta(&request.name, Some(&request.namespace), None),
        spec: Some(DeploymentSpec {
            replicas: Some(request.replicas),
            selector: LabelSelector {
                match_labels: Some(request.labels.clone()),
                match_expressions: None,
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(request.labels.clone()),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![request.container.to_container()],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}
