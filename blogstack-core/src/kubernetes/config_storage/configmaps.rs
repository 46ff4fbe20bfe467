//! ConfigMap manifests

use crate::kubernetes::object_meta;
use k8s_openapi::api::core::v1::ConfigMap;
use std::collections::BTreeMap;

/// Build a ConfigMap holding `data`
pub fn build_config_map(name: &str, namespace: &str, data: BTreeMap<String, String>) -> ConfigMap {
    ConfigMap {
        metadata: object_meta(name, Some(namespace), None),
        data: if data.is_empty() { None } else { Some(data) },
        ..Default::default()
    }
}
