//! CLI configuration management

use anyhow::Result;
use blogstack_core::stack::Target;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_stack: String,
    pub stack_dir: PathBuf,
    pub default_target: Target,
    pub kube_context: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_stack: "dev".to_string(),
            stack_dir: PathBuf::from("."),
            default_target: Target::Docker,
            kube_context: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)?;
        Self::from_toml(&contents)
    }

    fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")?;
        Ok(PathBuf::from(home).join(".config/blogstack/cli.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml("default_target = \"kubernetes\"\n").unwrap();

        assert_eq!(config.default_target, Target::Kubernetes);
        assert_eq!(config.default_stack, "dev");
        assert_eq!(config.stack_dir, PathBuf::from("."));
        assert!(config.kube_context.is_none());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config {
            default_stack: "prod".to_string(),
            stack_dir: PathBuf::from("/srv/stacks"),
            default_target: Target::Kubernetes,
            kube_context: Some("kind-blog".to_string()),
        };

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = Config::from_toml(&text).unwrap();

        assert_eq!(parsed.default_stack, "prod");
        assert_eq!(parsed.kube_context.as_deref(), Some("kind-blog"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(Config::from_toml("default_target = \"nomad\"\n").is_err());
        assert!(Config::from_toml("default_stack = [").is_err());
    }
}
