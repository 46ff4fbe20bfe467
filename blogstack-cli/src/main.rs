//! blogstack CLI
//!
//! Preview, deploy and tear down the blog stack on Docker or Kubernetes

mod commands;
mod config;
mod output;

use anyhow::Result;
use blogstack_core::logging::LoggingConfig;
use blogstack_core::stack::Target;
use clap::{CommandFactory, Parser, Subcommand};
use commands::StackContext;
use output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Stack name; settings are read from Stack.<stack>.yaml
    #[arg(short, long, global = true, env = "BLOGSTACK_STACK")]
    stack: Option<String>,

    /// Directory holding stack files
    #[arg(long, global = true, env = "BLOGSTACK_STACK_DIR")]
    stack_dir: Option<PathBuf>,

    /// Output format (table, json, yaml)
    #[arg(short, long, global = true, default_value = "table")]
    output: String,

    /// Kubeconfig file (defaults to $KUBECONFIG or ~/.kube/config)
    #[arg(long, global = true)]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context
    #[arg(long, global = true)]
    context: Option<String>,

    /// Use the service account of the pod this runs in
    #[arg(long, global = true, conflicts_with_all = ["kubeconfig", "context"])]
    in_cluster: bool,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Also write JSON logs to this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resources the stack declares, in apply order
    Preview {
        /// Provider to render for (docker, kubernetes)
        #[arg(short, long)]
        target: Option<Target>,
        /// Print secret values instead of masking them
        #[arg(long)]
        show_secrets: bool,
    },
    /// Create or update every resource
    Up {
        /// Provider to deploy to (docker, kubernetes)
        #[arg(short, long)]
        target: Option<Target>,
    },
    /// Delete every resource in reverse dependency order
    Destroy {
        /// Provider to delete from (docker, kubernetes)
        #[arg(short, long)]
        target: Option<Target>,
    },
    /// Manage stack configuration values
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// List all values in the stack
    List {
        /// Print secret values instead of masking them
        #[arg(long)]
        show_secrets: bool,
    },
    /// Print one value
    Get {
        /// Key, e.g. POSTGRES_DB or blogs:POSTGRES_DB
        key: String,
        /// Print the value even if it is secret
        #[arg(long)]
        show_secrets: bool,
    },
    /// Set a value, creating the stack file if needed
    Set {
        key: String,
        value: String,
        /// Store as a secure value, masked in listings
        #[arg(long)]
        secret: bool,
    },
    /// Remove a value
    Rm { key: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        file_dir: cli.log_dir.clone(),
        ..LoggingConfig::with_level(&cli.log_level)
    };
    let _guard = logging
        .init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let config = config::Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring unreadable CLI config, using defaults");
        config::Config::default()
    });

    let ctx = StackContext::new(
        cli.stack.unwrap_or_else(|| config.default_stack.clone()),
        cli.stack_dir.unwrap_or_else(|| config.stack_dir.clone()),
        OutputFormat::from_str(&cli.output),
        cli.kubeconfig,
        cli.context.or_else(|| config.kube_context.clone()),
        cli.in_cluster,
    );
    tracing::debug!(stack = %ctx.stack, file = %ctx.stack_file.display(), "Resolved stack");

    match cli.command {
        Commands::Preview {
            target,
            show_secrets,
        } => commands::preview::handle_preview(
            &ctx,
            target.unwrap_or(config.default_target),
            show_secrets,
        )?,
        Commands::Up { target } => {
            commands::up::handle_up(&ctx, target.unwrap_or(config.default_target)).await?
        }
        Commands::Destroy { target } => {
            commands::destroy::handle_destroy(&ctx, target.unwrap_or(config.default_target))
                .await?
        }
        Commands::Config { command } => commands::config::handle_config_command(command, &ctx)?,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_preview() {
        let cli = Cli::parse_from([
            "blogstack",
            "preview",
            "--target",
            "k8s",
            "--stack",
            "prod",
            "-o",
            "yaml",
        ]);

        assert_eq!(cli.stack.as_deref(), Some("prod"));
        assert_eq!(cli.output, "yaml");
        match cli.command {
            Commands::Preview {
                target,
                show_secrets,
            } => {
                assert_eq!(target, Some(Target::Kubernetes));
                assert!(!show_secrets);
            }
            _ => panic!("expected preview"),
        }
    }

    #[test]
    fn test_parse_config_set_secret() {
        let cli = Cli::parse_from([
            "blogstack",
            "config",
            "set",
            "POSTGRES_PASSWORD",
            "hunter2",
            "--secret",
        ]);

        match cli.command {
            Commands::Config {
                command: ConfigCommands::Set { key, value, secret },
            } => {
                assert_eq!(key, "POSTGRES_PASSWORD");
                assert_eq!(value, "hunter2");
                assert!(secret);
            }
            _ => panic!("expected config set"),
        }
    }

    #[test]
    fn test_in_cluster_excludes_kubeconfig() {
        let cli = Cli::parse_from(["blogstack", "up", "--in-cluster"]);
        assert!(cli.in_cluster);

        assert!(Cli::try_parse_from([
            "blogstack",
            "up",
            "--in-cluster",
            "--kubeconfig",
            "/tmp/kubeconfig",
        ])
        .is_err());
    }

    #[test]
    fn test_rejects_unknown_target() {
        assert!(Cli::try_parse_from(["blogstack", "up", "--target", "nomad"]).is_err());
    }
}
