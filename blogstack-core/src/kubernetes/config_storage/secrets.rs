//! K8s Secret manifests
//!
//! Values go into `stringData`; the API server encodes them.

use crate::kubernetes::object_meta;
use k8s_openapi::api::core::v1::Secret;
use std::collections::BTreeMap;

pub const OPAQUE: &str = "Opaque";

/// Build an `Opaque` Secret from plaintext values
pub fn build_opaque_secret(
    name: &str,
    namespace: &str,
    string_data: BTreeMap<String, String>,
) -> Secret {
    Secret {
        metadata: object_meta(name, Some(namespace), None),
        type_: Some(OPAQUE.to_string()),
        string_data: if string_data.is_empty() {
            None
        } else {
            Some(string_data)
        },
        data: None,
        immutable: None,
    }
}
