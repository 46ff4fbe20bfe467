//! Settings consumed by the blog programs

use super::{Config, ConfigError, ConfigResult, StackConfig};
use secrecy::SecretString;
use std::fmt;

/// Configuration namespace of the blog stack
pub const CONFIG_NAMESPACE: &str = "blogs";

pub const POSTGRES_DB: &str = "POSTGRES_DB";
pub const POSTGRES_HOST: &str = "POSTGRES_HOST";
pub const POSTGRES_PORT: &str = "POSTGRES_PORT";
pub const POSTGRES_USER: &str = "POSTGRES_USER";
pub const POSTGRES_PASSWORD: &str = "POSTGRES_PASSWORD";

/// Database connection settings shared by both programs
#[derive(Clone)]
pub struct BlogSettings {
    pub postgres_db: String,
    pub postgres_host: String,
    pub postgres_port: u16,
    pub postgres_user: SecretString,
    pub postgres_password: SecretString,
}

impl BlogSettings {
    pub fn from_config(config: &Config<'_>) -> ConfigResult<Self> {
        let port = config.require_number(POSTGRES_PORT)?;
        let postgres_port = u16::try_from(port)
            .ok()
            .filter(|p| *p != 0)
            .ok_or_else(|| ConfigError::OutOfRange {
                key: format!("{}:{}", config.namespace(), POSTGRES_PORT),
                reason: format!("{} is not a valid TCP port", port),
            })?;

        Ok(Self {
            postgres_db: config.require(POSTGRES_DB)?,
            postgres_host: config.require(POSTGRES_HOST)?,
            postgres_port,
            postgres_user: config.require_secret(POSTGRES_USER)?,
            postgres_password: config.require_secret(POSTGRES_PASSWORD)?,
        })
    }

    /// Read the settings from the `blogs` namespace of `stack`
    pub fn from_stack(stack: &StackConfig) -> ConfigResult<Self> {
        Self::from_config(&stack.namespace(CONFIG_NAMESPACE))
    }
}

impl fmt::Debug for BlogSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlogSettings")
            .field("postgres_db", &self.postgres_db)
            .field("postgres_host", &self.postgres_host)
            .field("postgres_port", &self.postgres_port)
            .field("postgres_user", &super::SECRET_MASK)
            .field("postgres_password", &super::SECRET_MASK)
            .finish()
    }
}
