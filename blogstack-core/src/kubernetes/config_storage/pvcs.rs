//! PersistentVolumeClaim manifests

use crate::kubernetes::object_meta;
use k8s_openapi::api::core::v1::{
    PersistentVolumeClaim, PersistentVolumeClaimSpec, VolumeResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use std::collections::BTreeMap;

/// Parameters of a claim
#[derive(Debug, Clone)]
pub struct PvcRequest {
    pub name: String,
    /// `None` for claims embedded as StatefulSet volumeClaimTemplates
    pub namespace: Option<String>,
    pub access_modes: Vec<String>,
    pub storage: String,
    pub storage_class: Option<String>,
}

/// Build a PersistentVolumeClaim
pub fn build_pvc(request: &PvcRequest) -> PersistentVolumeClaim {
    let mut requests = BTreeMap::new();
    requests.insert("storage".to_string(), Quantity(request.storage.clone()));

    PersistentVolumeClaim {
        metadata: object_meta(&request.name, request.namespace.as_deref(), None),
        spec: Some(PersistentVolumeClaimSpec {
            access_modes: Some(request.access_modes.clone()),
            storage_class_name: request.storage_class.clone(),
            resources: Some(VolumeResourceRequirements {
                requests: Some(requests),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}
