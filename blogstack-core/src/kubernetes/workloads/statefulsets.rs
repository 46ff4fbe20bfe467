//! StatefulSet manifests

use super::ContainerTemplate;
use crate::kubernetes::object_meta;
use k8s_openapi::api::apps::v1::{StatefulSet, StatefulSetSpec};
use k8s_openapi::api::core::v1::{PersistentVolumeClaim, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct StatefulSetRequest {
    pub name: String,
    pub namespace: String,
    /// Governing (headless) Service
    pub service_name: String,
    pub replicas: i32,
    pub labels: BTreeMap<String, String>,
    pub container: ContainerTemplate,
    pub volume_claim_templates: Vec<PersistentVolumeClaim>,
}

/// Build a StatefulSet whose selector and pod labels are `request.labels`
pub fn build_statefulset(request: &StatefulSetRequest) -> StatefulSet {
    StatefulSet {
        metadata: object_meta(&request.name, Some(&request.namespace), None),
        spec: Some(StatefulSetSpec {
            service_name: Some(request.service_name.clone()),
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
            volume_claim_templates: if request.volume_claim_templates.is_empty() {
                None
            } else {
                Some(request.volume_claim_templates.clone())
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}
