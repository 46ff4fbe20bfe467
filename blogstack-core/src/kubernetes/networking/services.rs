//! Service manifests

use crate::kubernetes::object_meta;
use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::BTreeMap;

/// `clusterIP` value that makes a Service headless
pub const HEADLESS: &str = "None";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServicePortMapping {
    pub port: i32,
    pub target_port: i32,
}

#[derive(Debug, Clone)]
pub struct ServiceRequest {
    pub name: String,
    pub namespace: String,
    pub selector: BTreeMap<String, String>,
    pub ports: Vec<ServicePortMapping>,
    /// ClusterIP, NodePort, LoadBalancer; unset leaves the API default
    pub service_type: Option<String>,
    pub headless: bool,
}

/// Build a Service selecting pods by `request.selector`
pub fn build_service(request: &ServiceRequest) -> Service {
    let ports: Vec<ServicePort> = request
        .ports
        .iter()
        .map(|p| ServicePort {
            port: p.port,
            target_port: Some(IntOrString::Int(p.target_port)),
            ..Default::default()
        })
        .collect();

    Service {
        metadata: object_meta(&request.name, Some(&request.namespace), None),
        spec: Some(ServiceSpec {
            selector: Some(request.selector.clone()),
            ports: Some(ports),
            type_: request.service_type.clone(),
            cluster_ip: request.headless.then(|| HEADLESS.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}
