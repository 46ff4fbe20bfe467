//! Kubernetes program
//!
//! PostgreSQL runs as a single-replica StatefulSet behind a headless Service;
//! the blog runs as a Deployment behind a ClusterIP Service exposed through
//! an nginx Ingress. Connection settings reach the pods through a ConfigMap
//! and an Opaque Secret.

use super::{APP_IMAGE, APP_PORT, DB_DATA_PATH, DB_IMAGE, DB_PORT};
use crate::config::settings::{
    POSTGRES_DB, POSTGRES_HOST, POSTGRES_PASSWORD, POSTGRES_PORT, POSTGRES_USER,
};
use crate::config::BlogSettings;
use crate::graph::{GraphResult, StackGraph};
use crate::kubernetes::app_labels;
use crate::kubernetes::config_storage::{build_config_map, build_opaque_secret, build_pvc, PvcRequest};
use crate::kubernetes::manifest::Manifest;
use crate::kubernetes::namespaces::build_namespace;
use crate::kubernetes::networking::{
    build_ingress, build_service, IngressRequest, IngressRoute, ServicePortMapping, ServiceRequest,
};
use crate::kubernetes::workloads::{
    build_deployment, build_statefulset, env_from_config_map, env_from_secret, env_value,
    ContainerTemplate, DeploymentRequest, StatefulSetRequest,
};
use secrecy::ExposeSecret;
use std::collections::BTreeMap;

pub const NAMESPACE: &str = "blogs";
pub const CONFIG_MAP: &str = "blog-config";
pub const SECRET: &str = "blog-secrets";
pub const DB_CLAIM: &str = "blogdb-data";
pub const DB_STATEFULSET: &str = "blogdb";
pub const DB_SERVICE: &str = "blogdb";
pub const APP_DEPLOYMENT: &str = "blog-deployment";
pub const APP_SERVICE: &str = "blog-service";
pub const INGRESS: &str = "blog-ingress";

pub const APP_LABEL: &str = "blog";
pub const DB_LABEL: &str = "blogdb";

pub const DB_STORAGE: &str = "1Gi";
pub const ACCESS_MODE: &str = "ReadWriteOnce";
pub const APP_REPLICAS: i32 = 2;
pub const DB_REPLICAS: i32 = 1;
pub const APP_SERVICE_PORT: i32 = 80;
pub const INGRESS_CLASS: &str = "nginx";
pub const INGRESS_HOST: &str = "blog.local";

const PGDATA: &str = "PGDATA";

// Graph ids; the two "blogdb" objects need distinct ids
pub const ID_NAMESPACE: &str = "blogs";
pub const ID_CONFIG_MAP: &str = "blog-config";
pub const ID_SECRET: &str = "blog-secrets";
pub const ID_DB_CLAIM: &str = "blogdb-data";
pub const ID_DB_STATEFULSET: &str = "blogdb";
pub const ID_APP_DEPLOYMENT: &str = "blog-deployment";
pub const ID_APP_SERVICE: &str = "blog-service";
pub const ID_DB_SERVICE: &str = "blogdb-service";
pub const ID_INGRESS: &str = "blog-ingress";

/// Declare the Kubernetes manifest graph for `settings`
pub fn program(settings: &BlogSettings) -> GraphResult<StackGraph<Manifest>> {
    let mut graph = StackGraph::new();

    graph.add(ID_NAMESPACE, Manifest::Namespace(build_namespace(NAMESPACE)))?;

    graph.add(ID_CONFIG_MAP, Manifest::ConfigMap(config_map(settings)))?;
    graph.add(ID_SECRET, Manifest::Secret(secret(settings)))?;
    graph.add(
        ID_DB_CLAIM,
        Manifest::PersistentVolumeClaim(build_pvc(&db_claim(Some(NAMESPACE)))),
    )?;
    graph.add(ID_DB_SERVICE, Manifest::Service(db_service()))?;
    graph.add(ID_DB_STATEFULSET, Manifest::StatefulSet(db_statefulset()))?;
    graph.add(ID_APP_DEPLOYMENT, Manifest::Deployment(app_deployment()))?;
    graph.add(ID_APP_SERVICE, Manifest::Service(app_service()))?;
    graph.add(ID_INGRESS, Manifest::Ingress(ingress()))?;

    for id in [
        ID_CONFIG_MAP,
        ID_SECRET,
        ID_DB_CLAIM,
        ID_DB_SERVICE,
        ID_DB_STATEFULSET,
        ID_APP_DEPLOYMENT,
        ID_APP_SERVICE,
        ID_INGRESS,
    ] {
        graph.depends_on(id, [ID_NAMESPACE])?;
    }
    graph.depends_on(ID_DB_STATEFULSET, [ID_CONFIG_MAP, ID_SECRET, ID_DB_SERVICE])?;
    graph.depends_on(ID_APP_DEPLOYMENT, [ID_CONFIG_MAP, ID_SECRET, ID_DB_STATEFULSET])?;
    graph.depends_on(ID_INGRESS, [ID_APP_SERVICE])?;

    graph.validate()?;
    Ok(graph)
}

fn config_map(settings: &BlogSettings) -> k8s_openapi::api::core::v1::ConfigMap {
    let data = BTreeMap::from([
        (POSTGRES_DB.to_string(), settings.postgres_db.clone()),
        (POSTGRES_HOST.to_string(), settings.postgres_host.clone()),
        (POSTGRES_PORT.to_string(), settings.postgres_port.to_string()),
    ]);
    build_config_map(CONFIG_MAP, NAMESPACE, data)
}

fn secret(settings: &BlogSettings) -> k8s_openapi::api::core::v1::Secret {
    let data = BTreeMap::from([
        (
            POSTGRES_USER.to_string(),
            settings.postgres_user.expose_secret().clone(),
        ),
        (
            POSTGRES_PASSWORD.to_string(),
            settings.postgres_password.expose_secret().clone(),
        ),
    ]);
    build_opaque_secret(SECRET, NAMESPACE, data)
}

fn db_claim(namespace: Option<&str>) -> PvcRequest {
    PvcRequest {
        name: DB_CLAIM.to_string(),
        namespace: namespace.map(String::from),
        access_modes: vec![ACCESS_MODE.to_string()],
        storage: DB_STORAGE.to_string(),
        storage_class: None,
    }
}

fn db_statefulset() -> k8s_openapi::api::apps::v1::StatefulSet {
    let container = ContainerTemplate {
        name: "postgres".to_string(),
        image: DB_IMAGE.to_string(),
        ports: vec![i32::from(DB_PORT)],
        env: vec![
            env_from_secret(POSTGRES_USER, SECRET, POSTGRES_USER),
            env_from_secret(POSTGRES_PASSWORD, SECRET, POSTGRES_PASSWORD),
            env_from_config_map(POSTGRES_DB, CONFIG_MAP, POSTGRES_DB),
            env_value(PGDATA, &format!("{}/pgdata", DB_DATA_PATH)),
        ],
        volume_mounts: vec![(DB_CLAIM.to_string(), DB_DATA_PATH.to_string())],
    };

    build_statefulset(&StatefulSetRequest {
        name: DB_STATEFULSET.to_string(),
        namespace: NAMESPACE.to_string(),
        service_name: DB_SERVICE.to_string(),
        replicas: DB_REPLICAS,
        labels: app_labels(DB_LABEL),
        container,
        volume_claim_templates: vec![build_pvc(&db_claim(None))],
    })
}

fn app_deployment() -> k8s_openapi::api::apps::v1::Deployment {
    let container = ContainerTemplate {
        name: "blog-app".to_string(),
        image: APP_IMAGE.to_string(),
        ports: vec![i32::from(APP_PORT)],
        env: vec![
            env_from_config_map(POSTGRES_HOST, CONFIG_MAP, POSTGRES_HOST),
            env_from_config_map(POSTGRES_PORT, CONFIG_MAP, POSTGRES_PORT),
            env_from_config_map(POSTGRES_DB, CONFIG_MAP, POSTGRES_DB),
            env_from_secret(POSTGRES_USER, SECRET, POSTGRES_USER),
            env_from_secret(POSTGRES_PASSWORD, SECRET, POSTGRES_PASSWORD),
        ],
        volume_mounts: Vec::new(),
    };

    build_deployment(&DeploymentRequest {
        name: APP_DEPLOYMENT.to_string(),
        namespace: NAMESPACE.to_string(),
        replicas: APP_REPLICAS,
        labels: app_labels(APP_LABEL),
        container,
    })
}

fn app_service() -> k8s_openapi::api::core::v1::Service {
    build_service(&ServiceRequest {
        name: APP_SERVICE.to_string(),
        namespace: NAMESPACE.to_string(),
        selector: app_labels(APP_LABEL),
        ports: vec![ServicePortMapping {
            port: APP_SERVICE_PORT,
            target_port: i32::from(APP_PORT),
        }],
        service_type: Some("ClusterIP".to_string()),
        headless: false,
    })
}

fn db_service() -> k8s_openapi::api::core::v1::Service {
    build_service(&ServiceRequest {
        name: DB_SERVICE.to_string(),
        namespace: NAMESPACE.to_string(),
        selector: app_labels(DB_LABEL),
        ports: vec![ServicePortMapping {
            port: i32::from(DB_PORT),
            target_port: i32::from(DB_PORT),
        }],
        service_type: None,
        headless: true,
    })
}

fn ingress() -> k8s_openapi::api::networking::v1::Ingress {
    build_ingress(&IngressRequest {
        name: INGRESS.to_string(),
        namespace: NAMESPACE.to_string(),
        ingress_class: Some(INGRESS_CLASS.to_string()),
        routes: vec![IngressRoute {
            host: Some(INGRESS_HOST.to_string()),
            path: "/".to_string(),
            path_type: "Prefix".to_string(),
            service_name: APP_SERVICE.to_string(),
            service_port: APP_SERVICE_PORT,
        }],
    })
}
