//! Applying a manifest graph to a cluster
//!
//! Objects are pushed with server-side apply under a fixed field manager, so
//! repeated runs converge instead of failing on existing objects. The API
//! server owns reconciliation from there.

use super::client::K8sClient;
use super::error::{K8sError, K8sResult};
use super::manifest::Manifest;
use crate::graph::{Declaration, StackGraph};
use crate::outcome::{Action, ResourceOutcome};
use k8s_openapi::api::apps::v1::{Deployment, StatefulSet};
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, PersistentVolumeClaim, Secret, Service};
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::NamespaceResourceScope;
use kube::api::{Api, DeleteParams, Patch, PatchParams};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

/// Field manager recorded on every applied object
pub const FIELD_MANAGER: &str = "blogstack";

pub struct KubeDeployer {
    client: K8sClient,
}

impl KubeDeployer {
    pub fn new(client: K8sClient) -> Self {
        Self { client }
    }

    /// Apply every manifest in dependency order
    pub async fn up(&self, graph: &StackGraph<Manifest>) -> K8sResult<Vec<ResourceOutcome>> {
        let order = graph.apply_order()?;
        info!(
            api_server = %self.client.api_server(),
            resources = order.len(),
            "Applying stack to cluster"
        );

        let mut outcomes = Vec::with_capacity(order.len());
        for node in order {
            let action = self.apply_manifest(&node.payload).await?;
            info!(kind = node.kind(), name = %node.payload.name(), %action, "Applied");
            outcomes.push(ResourceOutcome::new(node.kind(), node.payload.name(), action));
        }

        Ok(outcomes)
    }

    /// Delete every manifest in reverse dependency order
    pub async fn destroy(&self, graph: &StackGraph<Manifest>) -> K8sResult<Vec<ResourceOutcome>> {
        let order = graph.destroy_order()?;
        info!(
            api_server = %self.client.api_server(),
            resources = order.len(),
            "Destroying stack in cluster"
        );

        let mut outcomes = Vec::with_capacity(order.len());
        for node in order {
            let action = self.delete_manifest(&node.payload).await?;
            info!(kind = node.kind(), name = %node.payload.name(), %action, "Deleted");
            outcomes.push(ResourceOutcome::new(node.kind(), node.payload.name(), action));
        }

        Ok(outcomes)
    }

    async fn apply_manifest(&self, manifest: &Manifest) -> K8sResult<Action> {
        match manifest {
            Manifest::Namespace(o) => {
                apply_object(Api::<Namespace>::all(self.client.inner().clone()), o).await
            }
            Manifest::ConfigMap(o) => apply_object(self.namespaced(manifest)?, o).await,
            Manifest::Secret(o) => apply_object(self.namespaced(manifest)?, o).await,
            Manifest::PersistentVolumeClaim(o) => apply_object(self.namespaced(manifest)?, o).await,
            Manifest::StatefulSet(o) => apply_object(self.namespaced(manifest)?, o).await,
            Manifest::Deployment(o) => apply_object(self.namespaced(manifest)?, o).await,
            Manifest::Service(o) => apply_object(self.namespaced(manifest)?, o).await,
            Manifest::Ingress(o) => apply_object(self.namespaced(manifest)?, o).await,
        }
    }

    async fn delete_manifest(&self, manifest: &Manifest) -> K8sResult<Action> {
        let name = manifest.name();
        match manifest {
            Manifest::Namespace(_) => {
                delete_object(Api::<Namespace>::all(self.client.inner().clone()), name).await
            }
            Manifest::ConfigMap(_) => {
                delete_object(self.namespaced::<ConfigMap>(manifest)?, name).await
            }
            Manifest::Secret(_) => delete_object(self.namespaced::<Secret>(manifest)?, name).await,
            Manifest::PersistentVolumeClaim(_) => {
                delete_object(self.namespaced::<PersistentVolumeClaim>(manifest)?, name).await
            }
            Manifest::StatefulSet(_) => {
                delete_object(self.namespaced::<StatefulSet>(manifest)?, name).await
            }
            Manifest::Deployment(_) => {
                delete_object(self.namespaced::<Deployment>(manifest)?, name).await
            }
            Manifest::Service(_) => delete_object(self.namespaced::<Service>(manifest)?, name).await,
            Manifest::Ingress(_) => delete_object(self.namespaced::<Ingress>(manifest)?, name).await,
        }
    }

    fn namespaced<K>(&self, manifest: &Manifest) -> K8sResult<Api<K>>
    where
        K: kube::Resource<Scope = NamespaceResourceScope>,
        <K as kube::Resource>::DynamicType: Default,
    {
        let namespace = manifest.namespace().ok_or_else(|| {
            K8sError::Internal(format!(
                "{} {} has no namespace",
                manifest.kind(),
                manifest.name()
            ))
        })?;

        Ok(Api::namespaced(self.client.inner().clone(), namespace))
    }
}

async fn apply_object<K>(api: Api<K>, object: &K) -> K8sResult<Action>
where
    K: kube::Resource + Clone + DeserializeOwned + Serialize + Debug,
{
    let name = object
        .meta()
        .name
        .clone()
        .ok_or_else(|| K8sError::Internal("Manifest without a name".to_string()))?;

    let existed = api.get_opt(&name).await?.is_some();

    let params = PatchParams::apply(FIELD_MANAGER).force();
    api.patch(&name, &params, &Patch::Apply(object)).await?;
    debug!(%name, existed, "Server-side apply complete");

    Ok(if existed {
        Action::Configured
    } else {
        Action::Created
    })
}

async fn delete_object<K>(api: Api<K>, name: &str) -> K8sResult<Action>
where
    K: kube::Resource + Clone + DeserializeOwned + Debug,
{
    match api.delete(name, &DeleteParams::default()).await {
        Ok(_) => Ok(Action::Deleted),
        Err(kube::Error::Api(resp)) if resp.code == 404 => Ok(Action::Absent),
        Err(e) => Err(e.into()),
    }
}
