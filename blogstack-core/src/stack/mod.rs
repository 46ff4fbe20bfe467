//! Blog stack programs
//!
//! Each program reads [`BlogSettings`](crate::config::BlogSettings) and declares the full resource graph
//! for one provider. Nothing here talks to a provider.

pub mod docker;
pub mod kubernetes;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Application image shared by both programs
pub const APP_IMAGE: &str = "ivanakoceva/blog-app:latest";
/// Database image shared by both programs
pub const DB_IMAGE: &str = "postgres:17-alpine";
/// Port the blog application listens on
pub const APP_PORT: u16 = 8080;
/// Port PostgreSQL listens on inside its container
pub const DB_PORT: u16 = 5432;
/// PostgreSQL data directory
pub const DB_DATA_PATH: &str = "/var/lib/postgresql/data";

/// Provider a program targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Docker,
    Kubernetes,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Docker => f.write_str("docker"),
            Target::Kubernetes => f.write_str("kubernetes"),
        }
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "docker" => Ok(Target::Docker),
            "kubernetes" | "k8s" => Ok(Target::Kubernetes),
            other => Err(format!(
                "unknown target '{}', expected 'docker' or 'kubernetes'",
                other
            )),
        }
    }
}

/// Produce a copy with secret values replaced by a mask
pub trait Redact {
    fn redacted(&self) -> Self;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_parsing() {
        assert_eq!("docker".parse::<Target>().unwrap(), Target::Docker);
        assert_eq!("Kubernetes".parse::<Target>().unwrap(), Target::Kubernetes);
        assert_eq!("k8s".parse::<Target>().unwrap(), Target::Kubernetes);
        assert!("nomad".parse::<Target>().is_err());
    }

    #[test]
    fn test_target_display() {
        assert_eq!(Target::Docker.to_string(), "docker");
        assert_eq!(Target::Kubernetes.to_string(), "kubernetes");
    }
}
