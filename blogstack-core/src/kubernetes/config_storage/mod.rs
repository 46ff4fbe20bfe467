//! Kubernetes configuration and storage manifests
//!
//! Builds ConfigMaps, Secrets and PVCs.

pub mod configmaps;
pub mod pvcs;
pub mod secrets;

pub use configmaps::build_config_map;
pub use pvcs::{build_pvc, PvcRequest};
pub use secrets::build_opaque_secret;
