//! Stack configuration commands

use super::StackContext;
use crate::output::{self, OutputFormat};
use crate::ConfigCommands;
use anyhow::{anyhow, bail, Result};
use blogstack_core::config::{ConfigEntry, StackConfig, CONFIG_NAMESPACE};
use serde::Serialize;
use tabled::Tabled;

#[derive(Tabled, Serialize)]
struct EntryRow {
    key: String,
    value: String,
    secret: bool,
}

impl From<ConfigEntry> for EntryRow {
    fn from(e: ConfigEntry) -> Self {
        Self {
            key: e.key,
            value: e.value,
            secret: e.secret,
        }
    }
}

pub fn handle_config_command(command: ConfigCommands, ctx: &StackContext) -> Result<()> {
    match command {
        ConfigCommands::List { show_secrets } => {
            let stack = ctx.load_stack()?;
            let rows: Vec<EntryRow> = stack
                .entries(show_secrets)
                .into_iter()
                .map(EntryRow::from)
                .collect();
            output::print_output(rows, ctx.format)?;
        }

        ConfigCommands::Get { key, show_secrets } => {
            let stack = ctx.load_stack()?;
            let entry = find_entry(&stack, &key, show_secrets)
                .ok_or_else(|| anyhow!("'{}' is not set in stack '{}'", key, ctx.stack))?;

            match ctx.format {
                OutputFormat::Table => println!("{}", entry.value),
                format => output::print_single(&entry, format)?,
            }
        }

        ConfigCommands::Set { key, value, secret } => {
            let mut stack = StackConfig::load_or_default(&ctx.stack_file)?;
            let key = StackConfig::qualify(CONFIG_NAMESPACE, &key);
            stack.set(&key, value, secret);
            stack.save(&ctx.stack_file)?;

            let kind = if secret { "secret" } else { "value" };
            output::print_success(&format!("Set {} {} in stack '{}'", kind, key, ctx.stack));
        }

        ConfigCommands::Rm { key } => {
            let mut stack = ctx.load_stack()?;
            let key = StackConfig::qualify(CONFIG_NAMESPACE, &key);
            if !stack.remove(&key) {
                bail!("'{}' is not set in stack '{}'", key, ctx.stack);
            }
            stack.save(&ctx.stack_file)?;
            output::print_success(&format!("Removed {} from stack '{}'", key, ctx.stack));
        }
    }

    Ok(())
}

/// Look up `key`, qualifying bare names with the blog namespace
fn find_entry(stack: &StackConfig, key: &str, reveal: bool) -> Option<ConfigEntry> {
    let key = StackConfig::qualify(CONFIG_NAMESPACE, key);
    stack.entries(reveal).into_iter().find(|e| e.key == key)
}
