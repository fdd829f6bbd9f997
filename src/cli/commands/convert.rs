//! Convert command implementation
//!
//! Converts sample JSON files in parallel. Each file is handed to a blocking
//! worker; all workers share one mapping configuration.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use futures::stream::{self, StreamExt};

use super::{load_or_default, EXIT_CONFIG_ERROR};
use crate::core::dispatch::Converter;
use crate::core::extensions::ExtensionComposer;
use crate::domain::context::ResultExt;
use crate::domain::{HkFhirError, Result, SampleRecord};
use crate::{log_conversion_complete, log_error_with_context};

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Sample JSON files, each holding one sample or an array of samples
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory for `<name>.fhir.json` output files (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Result of converting one input file
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub records: Vec<serde_json::Value>,
    /// One message per sample that failed, prefixed with its position
    pub failures: Vec<String>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Reads a file holding one sample or an array of samples
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not sample JSON
pub fn read_samples(path: &Path) -> Result<Vec<SampleRecord>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read sample file {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    let samples: std::result::Result<Vec<SampleRecord>, serde_json::Error> = if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value::<SampleRecord>(value).map(|sample| vec![sample])
    };
    samples.with_context(|| format!("Invalid sample in {}", path.display()))
}

/// Converts every sample of one file
///
/// # Errors
///
/// Returns an error only if the file itself cannot be read; per-sample
/// failures are collected in the outcome.
pub fn convert_file(converter: &Converter, path: &Path) -> Result<FileOutcome> {
    let samples = read_samples(path)?;
    let mut outcome = FileOutcome {
        input: path.to_path_buf(),
        records: Vec::with_capacity(samples.len()),
        failures: Vec::new(),
    };
    for (index, result) in converter.convert_all(&samples).into_iter().enumerate() {
        match result.map_err(HkFhirError::from).and_then(|record| record.into_json()) {
            Ok(json) => outcome.records.push(json),
            Err(e) => {
                log_error_with_context!(&e, format!("sample {index} of {}", path.display()));
                outcome.failures.push(format!("#{index}: {e}"));
            }
        }
    }
    Ok(outcome)
}

/// One output file per input, `<stem>.fhir.json`
///
/// Inputs sharing a stem get a numeric suffix (`<stem>-2.fhir.json`) in input
/// order, so no two inputs write the same file.
fn output_paths(dir: &Path, inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut taken = HashSet::new();
    inputs
        .iter()
        .map(|input| {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "samples".to_string());
            let mut name = format!("{stem}.fhir.json");
            let mut n = 2;
            while !taken.insert(name.clone()) {
                name = format!("{stem}-{n}.fhir.json");
                n += 1;
            }
            dir.join(name)
        })
        .collect()
}

impl ConvertArgs {
    /// Execute the convert command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(inputs = self.inputs.len(), "Starting convert command");

        let config = match load_or_default(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };
        let mappings = match config.load_mappings() {
            Ok(mappings) => mappings,
            Err(e) => {
                eprintln!("❌ Failed to load mappings: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };
        let options = match config.conversion.options() {
            Ok(options) => options,
            Err(e) => {
                eprintln!("❌ Invalid conversion settings: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let mappings = Arc::new(mappings);
        let composer = ExtensionComposer::for_mappings(config.extensions.selection(), Arc::clone(&mappings));
        let converter = Arc::new(Converter::new(mappings).with_composer(composer).with_options(options));

        if let Some(dir) = &self.output {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        }

        let started = Instant::now();
        let results: Vec<_> = stream::iter(self.inputs.clone())
            .map(|path| {
                let converter = Arc::clone(&converter);
                tokio::task::spawn_blocking(move || {
                    let outcome = convert_file(&converter, &path);
                    (path, outcome)
                })
            })
            .buffered(config.conversion.workers)
            .collect()
            .await;

        let targets = match &self.output {
            Some(dir) => output_paths(dir, &self.inputs).into_iter().map(Some).collect(),
            None => vec![None; self.inputs.len()],
        };

        let mut converted = 0usize;
        let mut failed_files = 0usize;
        for (joined, target) in results.into_iter().zip(targets) {
            let (path, outcome) =
                joined.map_err(|e| anyhow::anyhow!("Conversion worker failed: {e}"))?;
            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(e) => {
                    failed_files += 1;
                    eprintln!("❌ {}: {e}", path.display());
                    continue;
                }
            };

            converted += outcome.records.len();
            self.write_records(&outcome, target.as_deref())?;

            if outcome.is_success() {
                eprintln!("✅ {}: {} record(s)", path.display(), outcome.records.len());
            } else {
                failed_files += 1;
                eprintln!(
                    "❌ {}: {} converted, {} failed",
                    path.display(),
                    outcome.records.len(),
                    outcome.failures.len()
                );
                for failure in &outcome.failures {
                    eprintln!("   {failure}");
                }
            }
        }

        log_conversion_complete!(converted, started.elapsed());
        Ok(if failed_files == 0 { 0 } else { 1 })
    }

    fn write_records(&self, outcome: &FileOutcome, target: Option<&Path>) -> anyhow::Result<()> {
        let records = serde_json::Value::Array(outcome.records.clone());
        let text = if self.pretty {
            serde_json::to_string_pretty(&records)?
        } else {
            serde_json::to_string(&records)?
        };
        match target {
            Some(target) => {
                fs::write(target, text)
                    .with_context(|| format!("Failed to write {}", target.display()))?;
            }
            None => println!("{text}"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::MappingConfiguration;
    use serde_json::json;
    use tempfile::TempDir;

    fn heart_rate_json(value: f64) -> serde_json::Value {
        json!({
            "kind": "quantity",
            "id": "6F9619FF-8B86-D011-B42D-00C04FC964FF",
            "typeIdentifier": "HKQuantityTypeIdentifierHeartRate",
            "start": "2024-03-01T10:00:00Z",
            "end": "2024-03-01T10:00:00Z",
            "value": value,
            "unit": "count/min"
        })
    }

    fn converter() -> Converter {
        Converter::new(Arc::new(MappingConfiguration::bundled().unwrap()))
    }

    #[test]
    fn test_read_single_and_array() {
        let dir = TempDir::new().unwrap();
        let single = dir.path().join("one.json");
        fs::write(&single, heart_rate_json(70.0).to_string()).unwrap();
        assert_eq!(read_samples(&single).unwrap().len(), 1);

        let many = dir.path().join("many.json");
        fs::write(&many, json!([heart_rate_json(70.0), heart_rate_json(71.0)]).to_string()).unwrap();
        assert_eq!(read_samples(&many).unwrap().len(), 2);
    }

    #[test]
    fn test_convert_file_collects_failures() {
        let dir = TempDir::new().unwrap();
        let mut bad = heart_rate_json(70.0);
        bad["unit"] = json!("kg");
        let path = dir.path().join("mixed.json");
        fs::write(&path, json!([heart_rate_json(70.0), bad]).to_string()).unwrap();

        let outcome = convert_file(&converter(), &path).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].starts_with("#1"));
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_output_paths() {
        assert_eq!(
            output_paths(Path::new("out"), &[PathBuf::from("data/hr.json")]),
            vec![PathBuf::from("out/hr.fhir.json")]
        );
    }

    #[test]
    fn test_output_paths_with_shared_stem() {
        let inputs = [
            PathBuf::from("monday/hr.json"),
            PathBuf::from("tuesday/hr.json"),
            PathBuf::from("steps.json"),
            PathBuf::from("wednesday/hr.json"),
        ];
        assert_eq!(
            output_paths(Path::new("out"), &inputs),
            vec![
                PathBuf::from("out/hr.fhir.json"),
                PathBuf::from("out/hr-2.fhir.json"),
                PathBuf::from("out/steps.fhir.json"),
                PathBuf::from("out/hr-3.fhir.json"),
            ]
        );
    }
}
