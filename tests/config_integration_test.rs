//! Integration tests for configuration loading and validation
//!
//! Tests that touch environment variables hold ENV_MUTEX.

use hkfhir::config::load_config;
use hkfhir::core::extensions::StandardExtensions;
use hkfhir::domain::QuantityType;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const OVERRIDE_VARS: &[&str] = &[
    "HKFHIR_APPLICATION_LOG_LEVEL",
    "HKFHIR_MAPPING_OVERRIDE_PATH",
    "HKFHIR_CONVERSION_FALLBACK_TIMEZONE",
    "HKFHIR_CONVERSION_WORKERS",
    "HKFHIR_EXTENSIONS_METADATA",
    "HKFHIR_LOGGING_LOCAL_ENABLED",
    "TEST_HKFHIR_ZONE",
    "TEST_HKFHIR_OVERRIDES",
];

fn cleanup_env_vars() {
    for var in OVERRIDE_VARS {
        std::env::remove_var(var);
    }
}

fn write_temp(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_temp(
        r#"
[application]
log_level = "debug"

[conversion]
fallback_timezone = "Australia/Sydney"
workers = 16

[extensions]
source_device = true
source_revision = false
absolute_time_range = true
metadata = false

[logging]
local_enabled = false
local_path = "/tmp/hkfhir-logs"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).expect("Failed to load config");
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.conversion.workers, 16);
    assert_eq!(
        config.extensions.selection(),
        StandardExtensions {
            source_device: true,
            source_revision: false,
            absolute_time_range: true,
            metadata: false,
        }
    );
    assert_eq!(config.logging.local_rotation, "hourly");
    assert!(config.conversion.options().unwrap().fallback_timezone.is_some());
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_temp("[application]\n");
    let config = load_config(file.path()).expect("Failed to load config");
    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.conversion.workers, 4);
    assert!(config.mapping.override_path.is_none());
    assert_eq!(config.extensions.selection(), StandardExtensions::default());
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_HKFHIR_ZONE", "Europe/Paris");

    let file = write_temp(
        r#"
[conversion]
fallback_timezone = "${TEST_HKFHIR_ZONE}"
"#,
    );
    let config = load_config(file.path()).expect("Failed to load config");
    assert_eq!(config.conversion.fallback_timezone.as_deref(), Some("Europe/Paris"));

    cleanup_env_vars();
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("HKFHIR_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("HKFHIR_CONVERSION_WORKERS", "12");
    std::env::set_var("HKFHIR_EXTENSIONS_METADATA", "false");

    let file = write_temp(
        r#"
[application]
log_level = "info"

[conversion]
workers = 2
"#,
    );
    let config = load_config(file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.conversion.workers, 12);
    assert!(!config.extensions.metadata);

    cleanup_env_vars();
}

#[test]
fn test_invalid_override_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("HKFHIR_CONVERSION_FALLBACK_TIMEZONE", "Nowhere/Special");

    let file = write_temp("");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("fallback_timezone"));

    cleanup_env_vars();
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_temp(
        r#"
[application]
log_level = "invalid_level"
"#,
    );
    assert!(load_config(file.path()).is_err());
}

#[test]
fn test_override_path_applied_to_mappings() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let overrides = write_temp(
        r#"{
  "HKQuantitySample": {
    "HKQuantityTypeIdentifierHeartRate": {
      "codings": [{"system": "http://example.org/codes", "code": "HR"}],
      "unit": {"hkunit": "count/s"}
    }
  }
}"#,
    );
    std::env::set_var(
        "TEST_HKFHIR_OVERRIDES",
        overrides.path().to_string_lossy().into_owned(),
    );
    let file = write_temp(
        r#"
[mapping]
override_path = "${TEST_HKFHIR_OVERRIDES}"
"#,
    );

    let config = load_config(file.path()).expect("Failed to load config");
    let mappings = config.load_mappings().expect("Failed to load mappings");
    let heart_rate = mappings.quantity(QuantityType::HeartRate).unwrap();
    assert_eq!(heart_rate.unit.hkunit, "count/s");
    assert_eq!(heart_rate.codings[0].code, "HR");

    cleanup_env_vars();
}
