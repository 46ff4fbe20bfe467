//! Stack Configuration Tests
//! File-backed loading and saving of stack settings

mod common;

use blogstack_core::config::{BlogSettings, ConfigError, StackConfig};
use secrecy::ExposeSecret;
use tempfile::TempDir;

#[test]
fn test_stack_file_path() {
    let dir = std::path::Path::new("/srv/stacks");
    assert_eq!(
        StackConfig::stack_file(dir, "dev"),
        std::path::PathBuf::from("/srv/stacks/Stack.dev.yaml")
    );
}

#[test]
fn test_load_dev_stack_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = StackConfig::stack_file(dir.path(), "dev");
    std::fs::write(&path, common::DEV_STACK).unwrap();

    let stack = StackConfig::load(&path).unwrap();
    let settings = BlogSettings::from_stack(&stack).unwrap();

    assert_eq!(settings.postgres_port, 5432);
    assert_eq!(settings.postgres_user.expose_secret(), "postgres");
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = StackConfig::stack_file(dir.path(), "nope");

    assert!(matches!(StackConfig::load(&path), Err(ConfigError::Io { .. })));
    assert!(StackConfig::load_or_default(&path).unwrap().is_empty());
}

#[test]
fn test_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = StackConfig::stack_file(&dir.path().join("nested"), "prod");

    let mut stack = common::dev_stack();
    stack.set("blogs:POSTGRES_HOST", "db.internal".to_string(), false);
    stack.set("blogs:POSTGRES_PASSWORD", "s3cret".to_string(), true);
    stack.save(&path).unwrap();

    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert!(!on_disk.contains("s3cret"));

    let reloaded = StackConfig::load(&path).unwrap();
    let settings = BlogSettings::from_stack(&reloaded).unwrap();
    assert_eq!(settings.postgres_host, "db.internal");
    assert_eq!(settings.postgres_password.expose_secret(), "s3cret");
    assert_eq!(reloaded.len(), 5);
}

#[test]
fn test_malformed_yaml() {
    let err = StackConfig::from_yaml("config: [unclosed").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
