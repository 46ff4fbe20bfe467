//! Docker Program Tests
//! Resource declarations and apply ordering for the container engine

mod common;

use blogstack_core::docker::resources::{ContainerSpec, PortMapping};
use blogstack_core::docker::DockerResource;
use blogstack_core::graph::{Declaration, StackGraph};
use blogstack_core::stack::docker::*;
use blogstack_core::stack::Redact;
use common::{dev_settings, ids, position};

fn graph() -> StackGraph<DockerResource> {
    program(&dev_settings()).expect("Failed to build docker program")
}

fn container(graph: &StackGraph<DockerResource>, id: &str) -> ContainerSpec {
    match &graph.get(id).unwrap().payload {
        DockerResource::Container(spec) => spec.clone(),
        other => panic!("unexpected {}", other.kind()),
    }
}

fn env(spec: &ContainerSpec, name: &str) -> Option<String> {
    spec.envs
        .iter()
        .find(|e| e.name == name)
        .map(|e| e.value.clone())
}

#[test]
fn test_declares_every_resource() {
    let graph = graph();
    let declared: Vec<(String, &str, String)> = graph
        .iter()
        .map(|n| (n.id.clone(), n.kind(), n.payload.name().to_string()))
        .collect();

    assert_eq!(
        declared,
        vec![
            ("blog_app".into(), "image", "ivanakoceva/blog-app:latest".into()),
            ("blog_db".into(), "image", "postgres:17-alpine".into()),
            ("blog_network".into(), "network", "blog_network".into()),
            ("blogdb_data".into(), "volume", "blogdb_data".into()),
            ("db_service".into(), "container", "db_service".into()),
            ("blog_service".into(), "container", "blog_service".into()),
        ]
    );
}

#[test]
fn test_containers_follow_their_dependencies() {
    let order = ids(&graph().apply_order().unwrap());

    let db = position(&order, DB_CONTAINER);
    assert!(position(&order, DB_IMAGE_ID) < db);
    assert!(position(&order, NETWORK) < db);
    assert!(position(&order, DB_VOLUME) < db);

    let app = position(&order, APP_CONTAINER);
    assert!(position(&order, APP_IMAGE_ID) < app);
    assert!(db < app);
}

#[test]
fn test_destroy_removes_containers_before_their_resources() {
    let order = ids(&graph().destroy_order().unwrap());

    assert_eq!(order[0], APP_CONTAINER);
    assert_eq!(order[1], DB_CONTAINER);
    assert!(position(&order, DB_CONTAINER) < position(&order, DB_VOLUME));
    assert!(position(&order, DB_CONTAINER) < position(&order, NETWORK));
}

#[test]
fn test_db_container() {
    let spec = container(&graph(), DB_CONTAINER);

    assert_eq!(spec.image, "postgres:17-alpine");
    assert_eq!(spec.networks, vec!["blog_network".to_string()]);
    assert_eq!(
        spec.ports,
        vec![PortMapping {
            internal: 5432,
            external: 5432
        }]
    );
    assert_eq!(spec.volumes[0].container_path, "/var/lib/postgresql/data");
    assert_eq!(spec.volumes[0].volume_name, "blogdb_data");

    assert_eq!(env(&spec, "POSTGRES_DB").as_deref(), Some("blogs"));
    assert_eq!(env(&spec, "POSTGRES_USER").as_deref(), Some("postgres"));
    assert_eq!(env(&spec, "POSTGRES_PASSWORD").as_deref(), Some("admin"));
}

#[test]
fn test_app_container_reaches_db_by_container_name() {
    let spec = container(&graph(), APP_CONTAINER);

    assert_eq!(spec.image, "ivanakoceva/blog-app:latest");
    assert_eq!(spec.ports[0].internal, 8080);
    assert!(spec.volumes.is_empty());
    assert_eq!(env(&spec, "POSTGRES_HOST").as_deref(), Some(DB_CONTAINER));
    assert_eq!(env(&spec, "POSTGRES_PORT").as_deref(), Some("5432"));
}

#[test]
fn test_credentials_are_marked_sensitive() {
    let spec = container(&graph(), DB_CONTAINER);

    for e in &spec.envs {
        let expected = e.name == "POSTGRES_USER" || e.name == "POSTGRES_PASSWORD";
        assert_eq!(e.sensitive, expected, "{}", e.name);
    }
}

#[test]
fn test_redacted_preview_hides_credentials() {
    let graph = graph().map(<DockerResource as Redact>::redacted);
    let yaml = serde_yaml::to_string(&graph.get(DB_CONTAINER).unwrap().payload).unwrap();

    assert!(!yaml.contains("admin"));
    assert!(yaml.contains("blogs"));
    assert!(yaml.contains("kind: container"));
}

#[test]
fn test_create_config_uses_resolved_image() {
    let spec = container(&graph(), DB_CONTAINER);
    let config = spec.to_create_config("sha256:0123");

    assert_eq!(config.image.as_deref(), Some("sha256:0123"));
    assert!(config
        .env
        .unwrap()
        .contains(&"POSTGRES_DB=blogs".to_string()));
}

#[test]
fn test_app_uses_in_network_db_port() {
    let mut stack = common::dev_stack();
    stack.set("blogs:POSTGRES_PORT", "6543".to_string(), false);
    let settings = blogstack_core::config::BlogSettings::from_stack(&stack).unwrap();
    assert_eq!(settings.postgres_port, 6543);

    let graph = program(&settings).unwrap();
    let app = container(&graph, APP_CONTAINER);
    assert_eq!(env(&app, "POSTGRES_PORT").as_deref(), Some("5432"));

    let db = container(&graph, DB_CONTAINER);
    assert_eq!(db.ports[0].internal, 5432);
}
