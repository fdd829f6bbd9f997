//! Source revision extension

use super::{child_url, extension_url, ExtensionBuilder};
use crate::domain::record::{Extension, ExtensionValue, Observation};
use crate::domain::result::ConversionResult;
use crate::domain::sample::{SampleHeader, SourceRevision};

/// Writes an app/OS revision under `sourceRevision`
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceRevisionExtension;

impl ExtensionBuilder<SourceRevision> for SourceRevisionExtension {
    fn url(&self) -> String {
        extension_url("sourceRevision")
    }

    fn apply(&self, revision: &SourceRevision, observation: &mut Observation) -> ConversionResult<()> {
        let url = self.url();
        let string = |segments: &[&str], value: &str| {
            Extension::with_value(
                child_url(&url, segments),
                ExtensionValue::ValueString(value.to_string()),
            )
        };

        let mut block = Extension::nested(url.clone(), Vec::new());
        block.replace_extension(Extension::nested(
            child_url(&url, &["source"]),
            vec![
                string(&["source", "name"], &revision.source.name),
                string(
                    &["source", "bundleIdentifier"],
                    &revision.source.bundle_identifier,
                ),
            ],
        ));
        if let Some(version) = &revision.version {
            block.replace_extension(string(&["version"], version));
        }
        if let Some(product_type) = &revision.product_type {
            block.replace_extension(string(&["productType"], product_type));
        }
        block.replace_extension(string(
            &["OSVersion"],
            &revision.operating_system_version.to_string(),
        ));

        observation.append_extension(block, true);
        Ok(())
    }
}

/// Reads the revision from a sample header
///
/// Samples without a revision lose any existing `sourceRevision` extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleSourceRevisionExtension;

impl ExtensionBuilder<SampleHeader> for SampleSourceRevisionExtension {
    fn url(&self) -> String {
        SourceRevisionExtension.url()
    }

    fn apply(&self, header: &SampleHeader, observation: &mut Observation) -> ConversionResult<()> {
        match &header.source_revision {
            Some(revision) => SourceRevisionExtension.apply(revision, observation),
            None => {
                observation.remove_extensions(&self.url());
                Ok(())
            }
        }
    }
}
