//! Plan preview

use super::StackContext;
use crate::output::{self, join_or_dash, OutputFormat};
use anyhow::Result;
use blogstack_core::graph::{Declaration, StackGraph};
use blogstack_core::stack::{self, Redact, Target};
use serde::Serialize;
use tabled::Tabled;

#[derive(Tabled, Serialize)]
struct PlanRow {
    step: usize,
    kind: String,
    resource: String,
    #[tabled(rename = "depends on")]
    depends_on: String,
}

/// One declaration as printed by JSON/YAML preview
#[derive(Serialize)]
struct PlanEntry<'a, T> {
    step: usize,
    id: &'a str,
    kind: &'static str,
    depends_on: &'a [String],
    resource: &'a T,
}

pub fn handle_preview(ctx: &StackContext, target: Target, show_secrets: bool) -> Result<()> {
    let settings = ctx.settings()?;

    if show_secrets {
        tracing::warn!(stack = %ctx.stack, "Preview includes secret values in clear text");
    }

    match target {
        Target::Docker => render(ctx, target, &stack::docker::program(&settings)?, show_secrets),
        Target::Kubernetes => render(
            ctx,
            target,
            &stack::kubernetes::program(&settings)?,
            show_secrets,
        ),
    }
}

fn render<T>(ctx: &StackContext, target: Target, graph: &StackGraph<T>, show_secrets: bool) -> Result<()>
where
    T: Declaration + Redact + Clone + Serialize,
{
    let graph = graph.map(|r| if show_secrets { r.clone() } else { r.redacted() });
    let order = graph.apply_order()?;

    match ctx.format {
        OutputFormat::Table => {
            output::print_info(&format!(
                "Stack '{}' declares {} resources on {}",
                ctx.stack,
                order.len(),
                target
            ));
            output::print_table(plan_rows(&graph)?);
        }
        format => {
            let entries: Vec<PlanEntry<'_, T>> = order
                .iter()
                .enumerate()
                .map(|(i, node)| PlanEntry {
                    step: i + 1,
                    id: &node.id,
                    kind: node.kind(),
                    depends_on: &node.depends_on,
                    resource: &node.payload,
                })
                .collect();
            output::print_single(&entries, format)?;
        }
    }

    Ok(())
}

fn plan_rows<T: Declaration>(graph: &StackGraph<T>) -> Result<Vec<PlanRow>> {
    Ok(graph
        .apply_order()?
        .into_iter()
        .enumerate()
        .map(|(i, node)| PlanRow {
            step: i + 1,
            kind: node.kind().to_string(),
            resource: node.id.clone(),
            depends_on: join_or_dash(&node.depends_on),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogstack_core::config::{BlogSettings, StackConfig};

    fn settings() -> BlogSettings {
        let stack = StackConfig::from_yaml(
            r#"
config:
  blogs:POSTGRES_DB: blogs
  blogs:POSTGRES_HOST: blogdb
  blogs:POSTGRES_PORT: 5432
  blogs:POSTGRES_USER: postgres
  blogs:POSTGRES_PASSWORD:
    secure: YWRtaW4=
"#,
        )
        .unwrap();
        BlogSettings::from_stack(&stack).unwrap()
    }

    #[test]
    fn test_docker_plan_rows() {
        let graph = stack::docker::program(&settings()).unwrap();
        let rows = plan_rows(&graph).unwrap();

        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].step, 1);
        assert_eq!(rows[0].resource, "blog_app");
        assert_eq!(rows[0].depends_on, "-");

        let app = rows.last().unwrap();
        assert_eq!(app.resource, "blog_service");
        assert_eq!(app.kind, "container");
        assert!(app.depends_on.contains("db_service"));
    }

    #[test]
    fn test_kubernetes_plan_starts_with_namespace() {
        let graph = stack::kubernetes::program(&settings()).unwrap();
        let rows = plan_rows(&graph).unwrap();

        assert_eq!(rows.len(), 9);
        assert_eq!(rows[0].kind, "Namespace");
        assert_eq!(rows[0].resource, "blogs");
    }
}
