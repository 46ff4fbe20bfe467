//! Command handlers

pub mod config;
pub mod destroy;
pub mod preview;
pub mod up;

use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use blogstack_core::config::{BlogSettings, StackConfig};
use blogstack_core::kubernetes::K8sClient;
use blogstack_core::{ResourceOutcome, StackResult};
use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;

/// Everything a command needs to locate the stack and its provider
pub struct StackContext {
    pub stack: String,
    pub stack_file: PathBuf,
    pub format: OutputFormat,
    pub kubeconfig: Option<PathBuf>,
    pub kube_context: Option<String>,
    pub in_cluster: bool,
}

impl StackContext {
    pub fn new(
        stack: String,
        stack_dir: PathBuf,
        format: OutputFormat,
        kubeconfig: Option<PathBuf>,
        kube_context: Option<String>,
        in_cluster: bool,
    ) -> Self {
        let stack_file = StackConfig::stack_file(&stack_dir, &stack);
        Self {
            stack,
            stack_file,
            format,
            kubeconfig,
            kube_context,
            in_cluster,
        }
    }

    pub fn load_stack(&self) -> Result<StackConfig> {
        StackConfig::load(&self.stack_file)
            .with_context(|| format!("Failed to load stack '{}'", self.stack))
    }

    pub fn settings(&self) -> Result<BlogSettings> {
        let stack = self.load_stack()?;
        BlogSettings::from_stack(&stack)
            .with_context(|| format!("Stack '{}' is incomplete", self.stack))
    }

    pub async fn kube_client(&self) -> StackResult<K8sClient> {
        let context = self.kube_context.as_deref();
        let client = if self.in_cluster {
            K8sClient::from_incluster()?
        } else if let Some(path) = &self.kubeconfig {
            K8sClient::from_kubeconfig_file(path, context).await?
        } else {
            K8sClient::from_default(context).await?
        };

        let version = client.server_version().await?;
        tracing::info!(api_server = %client.api_server(), %version, "Connected to cluster");
        Ok(client)
    }
}

#[derive(Tabled, Serialize)]
struct OutcomeRow {
    kind: String,
    name: String,
    action: String,
}

impl From<ResourceOutcome> for OutcomeRow {
    fn from(o: ResourceOutcome) -> Self {
        Self {
            kind: o.kind,
            name: o.name,
            action: o.action.to_string(),
        }
    }
}

/// Print what `up` or `destroy` did to each resource
pub fn print_outcomes(outcomes: Vec<ResourceOutcome>, format: OutputFormat) -> Result<()> {
    let rows: Vec<OutcomeRow> = outcomes.into_iter().map(OutcomeRow::from).collect();
    output::print_output(rows, format)
}
