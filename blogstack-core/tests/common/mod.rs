//! Common test utilities and helpers

#![allow(dead_code)]

use blogstack_core::config::{BlogSettings, StackConfig};

/// Stack file matching the sample dev stack
pub const DEV_STACK: &str = r#"
config:
  blogs:POSTGRES_DB: blogs
  blogs:POSTGRES_HOST: blogdb
  blogs:POSTGRES_PORT: 5432
  blogs:POSTGRES_USER:
    secure: cG9zdGdyZXM=
  blogs:POSTGRES_PASSWORD:
    secure: YWRtaW4=
"#;

pub fn dev_stack() -> StackConfig {
    StackConfig::from_yaml(DEV_STACK).expect("Failed to parse dev stack")
}

pub fn dev_settings() -> BlogSettings {
    BlogSettings::from_stack(&dev_stack()).expect("Failed to read blog settings")
}

/// Ids of `nodes` in the order given
pub fn ids<T>(nodes: &[&blogstack_core::graph::Node<T>]) -> Vec<String> {
    nodes.iter().map(|n| n.id.clone()).collect()
}

/// Position of `id` in `order`
pub fn position(order: &[String], id: &str) -> usize {
    order
        .iter()
        .position(|o| o == id)
        .unwrap_or_else(|| panic!("{} missing from order", id))
}
