//! Ingress manifests

use crate::kubernetes::object_meta;
use k8s_openapi::api::networking::v1::{
    HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
    IngressServiceBackend, IngressSpec, ServiceBackendPort,
};

/// One host/path routed to a Service port
#[derive(Debug, Clone)]
pub struct IngressRoute {
    pub host: Option<String>,
    pub path: String,
    pub path_type: String,
    pub service_name: String,
    pub service_port: i32,
}

#[derive(Debug, Clone)]
pub struct IngressRequest {
    pub name: String,
    pub namespace: String,
    pub ingress_class: Option<String>,
    pub routes: Vec<IngressRoute>,
}

/// Build an Ingress with one rule per route
pub fn build_ingress(request: &IngressRequest) -> Ingress {
    let rules: Vec<IngressRule> = request
        .routes
        .iter()
        .map(|r| IngressRule {
            host: r.host.clone(),
            http: Some(HTTPIngressRuleValue {
                paths: vec![HTTPIngressPath {
                    path: Some(r.path.clone()),
                    path_type: r.path_type.clone(),
                    backend: IngressBackend {
                        service: Some(IngressServiceBackend {
                            name: r.service_name.clone(),
                            port: Some(ServiceBackendPort {
                                number: Some(r.service_port),
                                name: None,
                            }),
                        }),
                        resource: None,
                    },
                }],
            }),
        })
        .collect();

    Ingress {
        metadata: object_meta(&request.name, Some(&request.namespace), None),
        spec: Some(IngressSpec {
            ingress_class_name: request.ingress_class.clone(),
            rules: Some(rules),
            tls: None,
            default_backend: None,
        }),
        ..Default::default()
    }
}
