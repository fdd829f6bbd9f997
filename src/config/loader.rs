//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::HkFhirConfig;
use crate::domain::errors::HkFhirError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into HkFhirConfig
/// 4. Applies environment variable overrides (HKFHIR_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use hkfhir::config::loader::load_config;
///
/// let config = load_config("hkfhir.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<HkFhirConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(HkFhirError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        HkFhirError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration text, applying substitution, overrides and validation
///
/// # Errors
///
/// Same as [`load_config`], minus the file access failures.
pub fn parse_config(contents: &str) -> Result<HkFhirConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: HkFhirConfig = toml::from_str(&contents)
        .map_err(|e| HkFhirError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        HkFhirError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| HkFhirError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(HkFhirError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_bool(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

/// Applies environment variable overrides using the HKFHIR_* prefix
///
/// Variables follow the pattern HKFHIR_<SECTION>_<KEY>, for example
/// HKFHIR_CONVERSION_WORKERS or HKFHIR_LOGGING_LOCAL_PATH. Unparseable
/// numbers and booleans are ignored.
fn apply_env_overrides(config: &mut HkFhirConfig) {
    if let Ok(val) = std::env::var("HKFHIR_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("HKFHIR_MAPPING_OVERRIDE_PATH") {
        config.mapping.override_path = Some(val);
    }

    if let Ok(val) = std::env::var("HKFHIR_CONVERSION_FALLBACK_TIMEZONE") {
        config.conversion.fallback_timezone = Some(val);
    }
    if let Ok(val) = std::env::var("HKFHIR_CONVERSION_WORKERS") {
        if let Ok(workers) = val.parse() {
            config.conversion.workers = workers;
        }
    }

    let extensions = &mut config.extensions;
    for (name, flag) in [
        ("HKFHIR_EXTENSIONS_SOURCE_DEVICE", &mut extensions.source_device),
        ("HKFHIR_EXTENSIONS_SOURCE_REVISION", &mut extensions.source_revision),
        ("HKFHIR_EXTENSIONS_ABSOLUTE_TIME_RANGE", &mut extensions.absolute_time_range),
        ("HKFHIR_EXTENSIONS_METADATA", &mut extensions.metadata),
    ] {
        if let Some(val) = env_bool(name) {
            *flag = val;
        }
    }

    if let Some(val) = env_bool("HKFHIR_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val;
    }
    if let Ok(val) = std::env::var("HKFHIR_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("HKFHIR_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("HKFHIR_LOADER_TEST_ZONE", "Asia/Tokyo");
        let input = "fallback_timezone = \"${HKFHIR_LOADER_TEST_ZONE}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "fallback_timezone = \"Asia/Tokyo\"\n");
        std::env::remove_var("HKFHIR_LOADER_TEST_ZONE");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("HKFHIR_LOADER_MISSING");
        let result = substitute_env_vars("path = \"${HKFHIR_LOADER_MISSING}\"");
        assert!(result.unwrap_err().to_string().contains("HKFHIR_LOADER_MISSING"));
    }

    #[test]
    fn test_comments_not_substituted() {
        let input = "# path = \"${HKFHIR_LOADER_UNSET_IN_COMMENT}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-hkfhir.toml");
        assert!(matches!(result, Err(HkFhirError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[conversion]
fallback_timezone = "America/New_York"
workers = 2

[extensions]
source_device = false
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.conversion.workers, 2);
        assert!(!config.extensions.source_device);
    }

    #[test]
    fn test_invalid_section_value_rejected() {
        let result = parse_config("[conversion]\nworkers = 0\n");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Configuration validation failed"));
    }
}
