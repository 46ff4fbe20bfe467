//! Deploy the stack

use super::{print_outcomes, StackContext};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use blogstack_core::config::BlogSettings;
use blogstack_core::docker::DockerDeployer;
use blogstack_core::kubernetes::KubeDeployer;
use blogstack_core::stack::{self, Target};
use blogstack_core::{Action, ResourceOutcome, StackResult};

pub async fn handle_up(ctx: &StackContext, target: Target) -> Result<()> {
    let settings = ctx.settings()?;
    let outcomes = apply(ctx, target, &settings).await?;

    let changed = outcomes
        .iter()
        .filter(|o| o.action != Action::Unchanged)
        .count();
    let total = outcomes.len();

    print_outcomes(outcomes, ctx.format)?;
    if ctx.format == OutputFormat::Table {
        output::print_success(&format!(
            "Stack '{}' is up on {} ({} of {} resources changed)",
            ctx.stack, target, changed, total
        ));
    }

    Ok(())
}

async fn apply(
    ctx: &StackContext,
    target: Target,
    settings: &BlogSettings,
) -> StackResult<Vec<ResourceOutcome>> {
    let outcomes = match target {
        Target::Docker => {
            let graph = stack::docker::program(settings)?;
            let deployer = DockerDeployer::connect_local()?;
            let version = deployer.engine_version().await?;
            tracing::info!(%version, "Connected to Docker engine");
            deployer.up(&graph).await?
        }
        Target::Kubernetes => {
            let graph = stack::kubernetes::program(settings)?;
            KubeDeployer::new(ctx.kube_client().await?).up(&graph).await?
        }
    };

    Ok(outcomes)
}
