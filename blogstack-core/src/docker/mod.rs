//! Docker engine integration
//!
//! Walks a [`StackGraph`] of [`DockerResource`]s against the local engine.
//! Creation is idempotent: resources that already exist are left in place
//! and stopped containers are started.

pub mod error;
pub mod resources;

pub use error::{DockerError, DockerResult};
pub use resources::DockerResource;

use crate::graph::{Declaration, StackGraph};
use crate::outcome::{Action, ResourceOutcome};
use bollard::container::{
    CreateContainerOptions, InspectContainerOptions, RemoveContainerOptions, StartContainerOptions,
};
use bollard::image::{CreateImageOptions, RemoveImageOptions};
use bollard::network::{CreateNetworkOptions, InspectNetworkOptions};
use bollard::volume::{CreateVolumeOptions, RemoveVolumeOptions};
use bollard::Docker;
use error::is_not_found;
use futures::TryStreamExt;
use resources::{ContainerSpec, ImageSpec, NetworkSpec, VolumeSpec};
use std::collections::HashMap;
use tracing::{debug, info};

/// Docker deployment manager
pub struct DockerDeployer {
    docker: Docker,
}

impl DockerDeployer {
    /// Connect to the local engine (unix socket or named pipe)
    pub fn connect_local() -> DockerResult<Self> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| DockerError::Connection(e.to_string()))?;
        Ok(Self { docker })
    }

    /// Engine version, failing if the engine is unreachable
    pub async fn engine_version(&self) -> DockerResult<String> {
        let version = self
            .docker
            .version()
            .await
            .map_err(|e| DockerError::Connection(e.to_string()))?;
        Ok(version.version.unwrap_or_default())
    }

    /// Create every resource in dependency order
    pub async fn up(&self, graph: &StackGraph<DockerResource>) -> DockerResult<Vec<ResourceOutcome>> {
        let order = graph.apply_order()?;
        info!(resources = order.len(), "Applying stack to Docker engine");

        // image reference -> image id, filled as images are pulled
        let mut image_ids: HashMap<String, String> = HashMap::new();
        let mut outcomes = Vec::with_capacity(order.len());

        for node in order {
            let action = match &node.payload {
                DockerResource::Image(spec) => {
                    let (action, id) = self.ensure_image(spec).await?;
                    image_ids.insert(spec.name.clone(), id);
                    action
                }
                DockerResource::Network(spec) => self.ensure_network(spec).await?,
                DockerResource::Volume(spec) => self.ensure_volume(spec).await?,
                DockerResource::Container(spec) => {
                    let image = image_ids
                        .get(&spec.image)
                        .map(String::as_str)
                        .unwrap_or(&spec.image);
                    self.ensure_container(spec, image).await?
                }
            };

            info!(kind = node.kind(), name = %node.payload.name(), %action, "Applied");
            outcomes.push(ResourceOutcome::new(node.kind(), node.payload.name(), action));
        }

        Ok(outcomes)
    }

    /// Remove every resource in reverse dependency order
    pub async fn destroy(
        &self,
        graph: &StackGraph<DockerResource>,
    ) -> DockerResult<Vec<ResourceOutcome>> {
        let order = graph.destroy_order()?;
        info!(resources = order.len(), "Destroying stack in Docker engine");

        let mut outcomes = Vec::with_capacity(order.len());
        for node in order {
            let name = node.payload.name();
            let result = match &node.payload {
                DockerResource::Container(_) => {
                    let options = RemoveContainerOptions {
                        force: true,
                        ..Default::default()
                    };
                    self.docker.remove_container(name, Some(options)).await
                }
                DockerResource::Volume(_) => {
                    self.docker
                        .remove_volume(name, None::<RemoveVolumeOptions>)
                        .await
                }
                DockerResource::Network(_) => self.docker.remove_network(name).await,
                DockerResource::Image(_) => self
                    .docker
                    .remove_image(name, None::<RemoveImageOptions>, None)
                    .await
                    .map(|_| ()),
            };

            let action = removal_action(result)?;

            info!(kind = node.kind(), %name, %action, "Deleted");
            outcomes.push(ResourceOutcome::new(node.kind(), name, action));
        }

        Ok(outcomes)
    }

    /// Pull `spec` and return the resulting image id. A pull that moves the
    /// tag to a new image counts as a change.
    async fn ensure_image(&self, spec: &ImageSpec) -> DockerResult<(Action, String)> {
        let previous = match self.docker.inspect_image(&spec.name).await {
            Ok(image) => image.id,
            Err(e) if is_not_found(&e) => None,
            Err(e) => return Err(e.into()),
        };

        info!(image = %spec.name, "Pulling image");
        let options = CreateImageOptions {
            from_image: spec.name.clone(),
            ..Default::default()
        };
        let progress: Vec<_> = self
            .docker
            .create_image(Some(options), None, None)
            .try_collect()
            .await?;
        debug!(image = %spec.name, events = progress.len(), "Pull complete");

        let image = self.docker.inspect_image(&spec.name).await?;
        let id = image
            .id
            .ok_or_else(|| DockerError::MissingImageId(spec.name.clone()))?;

        Ok((pull_action(previous.as_deref(), &id), id))
    }

    async fn ensure_network(&self, spec: &NetworkSpec) -> DockerResult<Action> {
        match self
            .docker
            .inspect_network(&spec.name, None::<InspectNetworkOptions<String>>)
            .await
        {
            Ok(_) => Ok(Action::Unchanged),
            Err(e) if is_not_found(&e) => {
                let options = CreateNetworkOptions {
                    name: spec.name.clone(),
                    ..Default::default()
                };
                self.docker.create_network(options).await?;
                Ok(Action::Created)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn ensure_volume(&self, spec: &VolumeSpec) -> DockerResult<Action> {
        match self.docker.inspect_volume(&spec.name).await {
            Ok(_) => Ok(Action::Unchanged),
            Err(e) if is_not_found(&e) => {
                let options = CreateVolumeOptions {
                    name: spec.name.clone(),
                    ..Default::default()
                };
                self.docker.create_volume(options).await?;
                Ok(Action::Created)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn ensure_container(&self, spec: &ContainerSpec, image: &str) -> DockerResult<Action> {
        let running = match self
            .docker
            .inspect_container(&spec.name, None::<InspectContainerOptions>)
            .await
        {
            Ok(inspect) => inspect
                .state
                .and_then(|s| s.running)
                .unwrap_or(false),
            Err(e) if is_not_found(&e) => {
                let options = CreateContainerOptions {
                    name: spec.name.clone(),
                    ..Default::default()
                };
                self.docker
                    .create_container(Some(options), spec.to_create_config(image))
                    .await?;
                self.start(&spec.name).await?;
                return Ok(Action::Created);
            }
            Err(e) => return Err(e.into()),
        };

        if running {
            Ok(Action::Unchanged)
        } else {
            self.start(&spec.name).await?;
            Ok(Action::Started)
        }
    }

    async fn start(&self, name: &str) -> DockerResult<()> {
        self.docker
            .start_container(name, None::<StartContainerOptions<String>>)
            .await?;
        Ok(())
    }
}

/// `Created` when the pull produced an image that was not there before
fn pull_action(previous: Option<&str>, current: &str) -> Action {
    match previous {
        Some(id) if id == current => Action::Unchanged,
        _ => Action::Created,
    }
}

/// Outcome of a remove call; a resource the engine no longer knows is `Absent`
fn removal_action(result: Result<(), bollard::errors::Error>) -> DockerResult<Action> {
    match result {
        Ok(()) => Ok(Action::Deleted),
        Err(e) if is_not_found(&e) => Ok(Action::Absent),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_error(status_code: u16) -> bollard::errors::Error {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message: "engine says no".into(),
        }
    }

    #[test]
    fn test_pull_of_missing_image_is_created() {
        assert_eq!(pull_action(None, "sha256:aaa"), Action::Created);
    }

    #[test]
    fn test_pull_that_moves_tag_is_created() {
        assert_eq!(pull_action(Some("sha256:aaa"), "sha256:bbb"), Action::Created);
    }

    #[test]
    fn test_pull_of_current_image_is_unchanged() {
        assert_eq!(pull_action(Some("sha256:aaa"), "sha256:aaa"), Action::Unchanged);
    }

    #[test]
    fn test_removal_actions() {
        assert_eq!(removal_action(Ok(())).unwrap(), Action::Deleted);
        assert_eq!(removal_action(Err(engine_error(404))).unwrap(), Action::Absent);

        let err = removal_action(Err(engine_error(409))).unwrap_err();
        assert!(matches!(err, DockerError::Engine(_)));
    }
}
