//! Configuration defaults, JSON loading and validation.

use std::io::Write;

use apexsim_core::common::error::ConfigError;
use apexsim_core::config::Config;
use pretty_assertions::assert_eq;
use rstest::rstest;

// ══════════════════════════════════════════════════════════
// Defaults
// ══════════════════════════════════════════════════════════

#[test]
fn test_defaults_describe_the_reference_machine() {
    let config = Config::default();
    assert_eq!(config.general.code_base, 4000);
    assert!(!config.general.trace);
    assert_eq!(config.core.arch_registers, 16);
    assert_eq!(config.core.physical_registers, 32);
    assert_eq!(config.core.iq_capacity, 12);
    assert_eq!(config.core.rob_capacity, 40);
    assert_eq!(config.core.mul_latency, 3);
    assert_eq!(config.memory.size_bytes, 4000);
    config.validate().unwrap();
}

#[test]
fn test_empty_json_is_the_default() {
    assert_eq!(Config::from_json("{}").unwrap(), Config::default());
}

#[test]
fn test_partial_json_keeps_other_defaults() {
    let config = Config::from_json(r#"{ "core": { "mul_latency": 5 } }"#).unwrap();
    assert_eq!(config.core.mul_latency, 5);
    assert_eq!(config.core.physical_registers, 32);
    assert_eq!(config.memory.size_bytes, 4000);
}

// ══════════════════════════════════════════════════════════
// Files
// ══════════════════════════════════════════════════════════

#[test]
fn test_from_file_reads_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "general": {{ "trace": true }}, "core": {{ "iq_capacity": 4 }} }}"#)
        .unwrap();
    let config = Config::from_file(file.path()).unwrap();
    assert!(config.general.trace);
    assert_eq!(config.core.iq_capacity, 4);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::from_file(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_malformed_json_is_a_parse_error() {
    assert!(matches!(
        Config::from_json(r#"{ "core": { "rob_capacity": "many" } }"#),
        Err(ConfigError::Parse(_))
    ));
}

// ══════════════════════════════════════════════════════════
// Validation
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(r#"{ "core": { "physical_registers": 17 } }"#, "core.physical_registers")]
#[case(r#"{ "core": { "arch_registers": 0 } }"#, "core.arch_registers")]
#[case(r#"{ "core": { "iq_capacity": 0 } }"#, "core.iq_capacity")]
#[case(r#"{ "core": { "rob_capacity": 0 } }"#, "core.rob_capacity")]
#[case(r#"{ "core": { "mul_latency": 0 } }"#, "core.mul_latency")]
#[case(r#"{ "memory": { "size_bytes": 10 } }"#, "memory.size_bytes")]
#[case(r#"{ "general": { "code_base": 4002 } }"#, "general.code_base")]
fn test_rejects_unbuildable_values(#[case] json: &str, #[case] expected: &str) {
    match Config::from_json(json) {
        Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
        other => panic!("expected {expected} to be rejected, got {other:?}"),
    }
}

#[test]
fn test_smallest_register_pool_is_accepted() {
    let config = Config::from_json(r#"{ "core": { "physical_registers": 18 } }"#).unwrap();
    assert_eq!(config.core.physical_registers, 18);
}
