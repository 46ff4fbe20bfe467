//! Docker engine program
//!
//! Two images, one bridge network, one named volume for PostgreSQL data and
//! the database and application containers attached to the network.

use super::{APP_IMAGE, APP_PORT, DB_DATA_PATH, DB_IMAGE, DB_PORT};
use crate::config::settings::{
    POSTGRES_DB, POSTGRES_HOST, POSTGRES_PASSWORD, POSTGRES_PORT, POSTGRES_USER,
};
use crate::config::BlogSettings;
use crate::docker::resources::{
    ContainerSpec, DockerResource, EnvVar, ImageSpec, NetworkSpec, PortMapping, VolumeMount,
    VolumeSpec,
};
use crate::graph::{GraphResult, StackGraph};
use secrecy::ExposeSecret;

pub const APP_IMAGE_ID: &str = "blog_app";
pub const DB_IMAGE_ID: &str = "blog_db";
pub const NETWORK: &str = "blog_network";
pub const DB_VOLUME: &str = "blogdb_data";
pub const DB_CONTAINER: &str = "db_service";
pub const APP_CONTAINER: &str = "blog_service";

/// Declare the Docker resource graph for `settings`
pub fn program(settings: &BlogSettings) -> GraphResult<StackGraph<DockerResource>> {
    let mut graph = StackGraph::new();

    graph.add(
        APP_IMAGE_ID,
        DockerResource::Image(ImageSpec {
            name: APP_IMAGE.to_string(),
        }),
    )?;
    graph.add(
        DB_IMAGE_ID,
        DockerResource::Image(ImageSpec {
            name: DB_IMAGE.to_string(),
        }),
    )?;
    graph.add(
        NETWORK,
        DockerResource::Network(NetworkSpec {
            name: NETWORK.to_string(),
        }),
    )?;
    graph.add(
        DB_VOLUME,
        DockerResource::Volume(VolumeSpec {
            name: DB_VOLUME.to_string(),
        }),
    )?;

    graph.add(DB_CONTAINER, DockerResource::Container(db_container(settings)))?;
    graph.depends_on(DB_CONTAINER, [DB_IMAGE_ID, NETWORK, DB_VOLUME])?;

    graph.add(APP_CONTAINER, DockerResource::Container(app_container(settings)))?;
    graph.depends_on(APP_CONTAINER, [APP_IMAGE_ID, NETWORK, DB_CONTAINER])?;

    graph.validate()?;
    Ok(graph)
}

fn db_container(settings: &BlogSettings) -> ContainerSpec {
    ContainerSpec {
        name: DB_CONTAINER.to_string(),
        image: DB_IMAGE.to_string(),
        networks: vec![NETWORK.to_string()],
        ports: vec![PortMapping {
            internal: DB_PORT,
            external: DB_PORT,
        }],
        envs: vec![
            EnvVar::plain(POSTGRES_DB, &settings.postgres_db),
            EnvVar::sensitive(POSTGRES_USER, settings.postgres_user.expose_secret()),
            EnvVar::sensitive(POSTGRES_PASSWORD, settings.postgres_password.expose_secret()),
        ],
        volumes: vec![VolumeMount {
            container_path: DB_DATA_PATH.to_string(),
            volume_name: DB_VOLUME.to_string(),
        }],
    }
}

// Containers on a user-defined network resolve each other by name, so the
// app reaches the database through the container name rather than the
// configured host, and on the port postgres listens on inside its container
// rather than the configured one.
fn app_container(settings: &BlogSettings) -> ContainerSpec {
    ContainerSpec {
        name: APP_CONTAINER.to_string(),
        image: APP_IMAGE.to_string(),
        networks: vec![NETWORK.to_string()],
        ports: vec![PortMapping {
            internal: APP_PORT,
            external: APP_PORT,
        }],
        envs: vec![
            EnvVar::plain(POSTGRES_HOST, DB_CONTAINER),
            EnvVar::plain(POSTGRES_PORT, DB_PORT.to_string()),
            EnvVar::plain(POSTGRES_DB, &settings.postgres_db),
            EnvVar::sensitive(POSTGRES_USER, settings.postgres_user.expose_secret()),
            EnvVar::sensitive(POSTGRES_PASSWORD, settings.postgres_password.expose_secret()),
        ],
        volumes: Vec::new(),
    }
}
