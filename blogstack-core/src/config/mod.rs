//! Stack configuration
//!
//! A stack is a named set of `<namespace>:<key>` settings stored in
//! `Stack.<name>.yaml`:
//!
//! ```yaml
//! config:
//!   blogs:POSTGRES_DB: blogs
//!   blogs:POSTGRES_PORT: 5432
//!   blogs:POSTGRES_PASSWORD:
//!     secure: YWRtaW4=
//! ```
//!
//! Plain values are scalars. `secure` values are base64 encoded on disk and
//! held as [`SecretString`] once loaded.

pub mod settings;

pub use settings::{BlogSettings, CONFIG_NAMESPACE};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Placeholder shown wherever a secret value would otherwise be printed
pub const SECRET_MASK: &str = "[secret]";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration value: {key}")]
    Missing { key: String },

    #[error("Configuration value {key} is not a number: {value}")]
    NotANumber { key: String, value: String },

    #[error("Configuration value {key} is out of range: {reason}")]
    OutOfRange { key: String, reason: String },

    #[error("Invalid secure value for {key}: {reason}")]
    InvalidSecret { key: String, reason: String },

    #[error("Unsupported value for {key}: expected a scalar or a secure value")]
    UnsupportedValue { key: String },

    #[error("Failed to parse stack file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Failed to access stack file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// On-disk layout of a stack file
#[derive(Debug, Default, Serialize, Deserialize)]
struct StackFile {
    #[serde(default)]
    config: BTreeMap<String, RawValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Secure { secure: String },
    Plain(serde_yaml::Value),
}

#[derive(Clone)]
enum ConfigValue {
    Plain(String),
    Secret(SecretString),
}

impl ConfigValue {
    fn expose(&self) -> &str {
        match self {
            ConfigValue::Plain(v) => v,
            ConfigValue::Secret(v) => v.expose_secret(),
        }
    }

    fn is_secret(&self) -> bool {
        matches!(self, ConfigValue::Secret(_))
    }
}

/// A single configuration entry as shown to users
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub secret: bool,
}

/// All settings of one stack
#[derive(Clone, Default)]
pub struct StackConfig {
    values: BTreeMap<String, ConfigValue>,
}

impl StackConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the stack file for `stack` inside `dir`
    pub fn stack_file(dir: &Path, stack: &str) -> PathBuf {
        dir.join(format!("Stack.{}.yaml", stack))
    }

    /// Qualify a bare key with `namespace`; keys that already carry one are kept
    pub fn qualify(namespace: &str, key: &str) -> String {
        if key.contains(':') {
            key.to_string()
        } else {
            format!("{}:{}", namespace, key)
        }
    }

    pub fn from_yaml(text: &str) -> ConfigResult<Self> {
        // An empty document is a stack with no settings
        if text.trim().is_empty() {
            return Ok(Self::new());
        }

        let file: StackFile = serde_yaml::from_str(text)?;
        let mut values = BTreeMap::new();

        for (key, raw) in file.config {
            let value = match raw {
                RawValue::Secure { secure } => {
                    let bytes = STANDARD.decode(secure.trim()).map_err(|e| {
                        ConfigError::InvalidSecret {
                            key: key.clone(),
                            reason: e.to_string(),
                        }
                    })?;
                    let text = String::from_utf8(bytes).map_err(|e| ConfigError::InvalidSecret {
                        key: key.clone(),
                        reason: e.to_string(),
                    })?;
                    ConfigValue::Secret(SecretString::new(text))
                }
                RawValue::Plain(value) => ConfigValue::Plain(scalar_to_string(&key, value)?),
            };
            values.insert(key, value);
        }

        Ok(Self { values })
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text)?;

        tracing::debug!(
            path = %path.display(),
            values = config.values.len(),
            "Loaded stack configuration"
        );

        Ok(config)
    }

    /// Load `path`, or start an empty stack if the file does not exist yet
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        let config = self
            .values
            .iter()
            .map(|(key, value)| {
                let raw = match value {
                    ConfigValue::Plain(v) => RawValue::Plain(serde_yaml::Value::String(v.clone())),
                    ConfigValue::Secret(v) => RawValue::Secure {
                        secure: STANDARD.encode(v.expose_secret()),
                    },
                };
                (key.clone(), raw)
            })
            .collect();

        Ok(serde_yaml::to_string(&StackFile { config })?)
    }

    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        std::fs::write(path, self.to_yaml()?).map_err(io_err)?;

        tracing::info!(path = %path.display(), "Saved stack configuration");
        Ok(())
    }

    /// Set a fully qualified key. Secret values are stored encoded on save.
    pub fn set(&mut self, key: &str, value: String, secret: bool) {
        let value = if secret {
            ConfigValue::Secret(SecretString::new(value))
        } else {
            ConfigValue::Plain(value)
        };
        self.values.insert(key.to_string(), value);
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_secret(&self, key: &str) -> bool {
        self.values.get(key).is_some_and(ConfigValue::is_secret)
    }

    /// Entries in key order, secret values masked unless `reveal` is set
    pub fn entries(&self, reveal: bool) -> Vec<ConfigEntry> {
        self.values
            .iter()
            .map(|(key, value)| ConfigEntry {
                key: key.clone(),
                value: if value.is_secret() && !reveal {
                    SECRET_MASK.to_string()
                } else {
                    value.expose().to_string()
                },
                secret: value.is_secret(),
            })
            .collect()
    }

    /// View of the keys under one namespace
    pub fn namespace(&self, namespace: &str) -> Config<'_> {
        Config {
            stack: self,
            namespace: namespace.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for StackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.values {
            match value {
                ConfigValue::Plain(v) => map.entry(key, v),
                ConfigValue::Secret(_) => map.entry(key, &SECRET_MASK),
            };
        }
        map.finish()
    }
}

fn scalar_to_string(key: &str, value: serde_yaml::Value) -> ConfigResult<String> {
    match value {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        _ => Err(ConfigError::UnsupportedValue {
            key: key.to_string(),
        }),
    }
}

/// Namespaced accessor over a [`StackConfig`]
#[derive(Debug, Clone)]
pub struct Config<'a> {
    stack: &'a StackConfig,
    namespace: String,
}

impl<'a> Config<'a> {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn full_key(&self, name: &str) -> String {
        format!("{}:{}", self.namespace, name)
    }

    fn lookup(&self, name: &str) -> ConfigResult<&'a ConfigValue> {
        let key = self.full_key(name);
        self.stack
            .values
            .get(&key)
            .ok_or(ConfigError::Missing { key })
    }

    /// Value of `name`, secret or not
    pub fn get(&self, name: &str) -> Option<String> {
        self.lookup(name).ok().map(|v| v.expose().to_string())
    }

    pub fn require(&self, name: &str) -> ConfigResult<String> {
        self.lookup(name).map(|v| v.expose().to_string())
    }

    pub fn require_number(&self, name: &str) -> ConfigResult<i64> {
        let value = self.lookup(name)?.expose();
        value
            .trim()
            .parse::<i64>()
            .map_err(|_| ConfigError::NotANumber {
                key: self.full_key(name),
                value: value.to_string(),
            })
    }

    /// Read `name` as a secret; plain values are promoted
    pub fn require_secret(&self, name: &str) -> ConfigResult<SecretString> {
        match self.lookup(name)? {
            ConfigValue::Secret(v) => Ok(v.clone()),
            ConfigValue::Plain(v) => Ok(SecretString::new(v.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STACK: &str = r#"
config:
  blogs:POSTGRES_DB: blogs
  blogs:POSTGRES_PORT: 5432
  blogs:DEBUG: true
  blogs:POSTGRES_PASSWORD:
    secure: YWRtaW4=
"#;

    #[test]
    fn test_plain_scalars_are_read_as_text() {
        let stack = StackConfig::from_yaml(STACK).unwrap();
        let config = stack.namespace("blogs");

        assert_eq!(config.require("POSTGRES_DB").unwrap(), "blogs");
        assert_eq!(config.require("POSTGRES_PORT").unwrap(), "5432");
        assert_eq!(config.get("DEBUG").as_deref(), Some("true"));
        assert_eq!(config.require_number("POSTGRES_PORT").unwrap(), 5432);
    }

    #[test]
    fn test_secure_value_is_decoded() {
        let stack = StackConfig::from_yaml(STACK).unwrap();
        let password = stack.namespace("blogs").require_secret("POSTGRES_PASSWORD").unwrap();

        assert_eq!(password.expose_secret(), "admin");
        assert!(stack.is_secret("blogs:POSTGRES_PASSWORD"));
    }

    #[test]
    fn test_missing_key_reports_full_name() {
        let stack = StackConfig::from_yaml(STACK).unwrap();
        let err = stack.namespace("blogs").require("POSTGRES_HOST").unwrap_err();

        assert!(matches!(err, ConfigError::Missing { ref key } if key == "blogs:POSTGRES_HOST"));
    }

    #[test]
    fn test_other_namespace_is_isolated() {
        let stack = StackConfig::from_yaml(STACK).unwrap();
        assert!(stack.namespace("other").get("POSTGRES_DB").is_none());
    }

    #[test]
    fn test_not_a_number() {
        let stack = StackConfig::from_yaml(STACK).unwrap();
        let err = stack.namespace("blogs").require_number("POSTGRES_DB").unwrap_err();
        assert!(matches!(err, ConfigError::NotANumber { .. }));
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        let yaml = "config:\n  blogs:POSTGRES_USER:\n    secure: '%%%'\n";
        let err = StackConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSecret { ref key, .. } if key == "blogs:POSTGRES_USER"));
    }

    #[test]
    fn test_sequence_value_is_rejected() {
        let yaml = "config:\n  blogs:HOSTS:\n    - a\n    - b\n";
        let err = StackConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedValue { .. }));
    }

    #[test]
    fn test_empty_document() {
        assert!(StackConfig::from_yaml("").unwrap().is_empty());
        assert!(StackConfig::from_yaml("config: {}\n").unwrap().is_empty());
    }

    #[test]
    fn test_entries_mask_secrets() {
        let stack = StackConfig::from_yaml(STACK).unwrap();
        let entries = stack.entries(false);
        let password = entries
            .iter()
            .find(|e| e.key == "blogs:POSTGRES_PASSWORD")
            .unwrap();

        assert!(password.secret);
        assert_eq!(password.value, SECRET_MASK);

        let revealed = stack.entries(true);
        assert!(revealed.iter().any(|e| e.value == "admin"));
    }

    #[test]
    fn test_debug_does_not_leak_secrets() {
        let stack = StackConfig::from_yaml(STACK).unwrap();
        let debug = format!("{:?}", stack);
        assert!(!debug.contains("admin"));
        assert!(debug.contains(SECRET_MASK));
    }

    #[test]
    fn test_set_secret_round_trips_through_yaml() {
        let mut stack = StackConfig::new();
        stack.set("blogs:POSTGRES_USER", "postgres".to_string(), true);
        stack.set("blogs:POSTGRES_DB", "blogs".to_string(), false);

        let yaml = stack.to_yaml().unwrap();
        assert!(yaml.contains("secure: cG9zdGdyZXM="));
        assert!(!yaml.contains("postgres\n"));

        let reloaded = StackConfig::from_yaml(&yaml).unwrap();
        assert!(reloaded.is_secret("blogs:POSTGRES_USER"));
        assert_eq!(reloaded.namespace("blogs").require("POSTGRES_DB").unwrap(), "blogs");
    }

    #[test]
    fn test_qualify() {
        assert_eq!(StackConfig::qualify("blogs", "POSTGRES_DB"), "blogs:POSTGRES_DB");
        assert_eq!(StackConfig::qualify("blogs", "aws:region"), "aws:region");
    }
}
