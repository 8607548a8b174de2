//! Configuration system tests.

use rollstat::core::{Config, ConfigBuilder, LogLevel};
use std::io::Write;
use std::time::Duration;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.rolling.window, Duration::from_secs(10));
    assert_eq!(config.rolling.buckets, 10);
    assert_eq!(config.logging.level, LogLevel::Info);
}

#[test]
fn test_config_builder() {
    let config = ConfigBuilder::new()
        .window(Duration::from_secs(30))
        .buckets(30)
        .build()
        .unwrap();

    assert_eq!(config.rolling.bucket_size_millis(), 1_000);
}

#[test]
fn test_builder_rejects_uneven_split() {
    let result = ConfigBuilder::new()
        .window(Duration::from_millis(10_000))
        .buckets(7)
        .build();
    assert!(result.is_err());
}

#[test]
fn test_invalid_yaml() {
    let result = ConfigBuilder::new().from_yaml("rolling: [not, a, map]");
    assert!(result.is_err());
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "rolling:\n  window: 1m\n  buckets: 6\nlogging:\n  level: debug\n  structured: true"
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.rolling.window, Duration::from_secs(60));
    assert_eq!(config.rolling.bucket_size_millis(), 10_000);
    assert_eq!(config.logging.level, LogLevel::Debug);
    assert!(config.logging.structured);
}

#[test]
fn test_from_file_rejects_invalid_shape() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "rolling:\n  window: 10s\n  buckets: 0").unwrap();

    let err = Config::from_file(file.path()).unwrap_err();
    assert_eq!(err.category(), "config");
}

#[test]
fn test_missing_file() {
    let err = Config::from_file("/definitely/not/here.yaml").unwrap_err();
    assert_eq!(err.category(), "io");
}
