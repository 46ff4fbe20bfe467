//! Kubernetes networking manifests
//!
//! Builds Services and Ingresses.

pub mod ingress;
pub mod services;

pub use ingress::{build_ingress, IngressRequest, IngressRoute};
pub use services::{build_service, ServicePortMapping, ServiceRequest};
