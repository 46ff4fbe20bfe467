//! Tear the stack down

use super::{print_outcomes, StackContext};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use blogstack_core::config::BlogSettings;
use blogstack_core::docker::DockerDeployer;
use blogstack_core::kubernetes::KubeDeployer;
use blogstack_core::stack::{self, Target};
use blogstack_core::{Action, ResourceOutcome, StackResult};

pub async fn handle_destroy(ctx: &StackContext, target: Target) -> Result<()> {
    let settings = ctx.settings()?;
    let outcomes = remove(ctx, target, &settings).await?;

    let absent = outcomes
        .iter()
        .filter(|o| o.action == Action::Absent)
        .count();

    print_outcomes(outcomes, ctx.format)?;
    if ctx.format == OutputFormat::Table {
        if absent > 0 {
            output::print_warning(&format!("{} resources were already gone", absent));
        }
        output::print_success(&format!("Stack '{}' destroyed on {}", ctx.stack, target));
    }

    Ok(())
}

async fn remove(
    ctx: &StackContext,
    target: Target,
    settings: &BlogSettings,
) -> StackResult<Vec<ResourceOutcome>> {
    let outcomes = match target {
        Target::Docker => {
            let graph = stack::docker::program(settings)?;
            DockerDeployer::connect_local()?.destroy(&graph).await?
        }
        Target::Kubernetes => {
            let graph = stack::kubernetes::program(settings)?;
            KubeDeployer::new(ctx.kube_client().await?)
                .destroy(&graph)
                .await?
        }
    };

    Ok(outcomes)
}
