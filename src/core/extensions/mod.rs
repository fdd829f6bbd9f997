//! Extension composition
//!
//! Extension builders attach url-keyed provenance blocks to a finished
//! Observation. Each builder is typed over the input it needs; the composer
//! holds them in one ordered list and hands every builder the input it accepts.
//!
//! ```rust
//! use hkfhir::core::extensions::{ExtensionComposer, ExtensionInput};
//!
//! let composer = ExtensionComposer::standard();
//! assert_eq!(composer.len(), 4);
//! # let _ = ExtensionInput::None;
//! ```

pub mod device;
pub mod metadata;
pub mod source_revision;
pub mod time_range;

use std::sync::Arc;

use crate::domain::errors::ConversionError;
use crate::domain::record::Observation;
use crate::domain::result::ConversionResult;
use crate::domain::sample::{SampleHeader, SourceRevision};
use crate::mapping::MappingConfiguration;

pub use device::SourceDeviceExtension;
pub use metadata::MetadataExtension;
pub use source_revision::{SampleSourceRevisionExtension, SourceRevisionExtension};
pub use time_range::{AbsoluteTimeRangeExtension, EffectiveTimeRangeExtension};

/// Namespace all provenance extension urls live under
pub const EXTENSION_URL_BASE: &str = "https://bdh.stanford.edu/fhir/defs/";

/// Full url of a top-level extension
pub fn extension_url(name: &str) -> String {
    format!("{EXTENSION_URL_BASE}{name}")
}

/// Appends path segments to an extension url, percent-encoding each segment
pub fn child_url(base: &str, segments: &[&str]) -> String {
    if let Ok(mut url) = url::Url::parse(base) {
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        return url.to_string();
    }
    let mut joined = base.trim_end_matches('/').to_string();
    for segment in segments {
        joined.push('/');
        joined.push_str(segment);
    }
    joined
}

/// Attaches one family of extensions to an Observation
pub trait ExtensionBuilder<I: ?Sized>: Send + Sync {
    /// Url of the top-level extension this builder owns
    fn url(&self) -> String;

    /// Writes (or removes) this builder's extension
    fn apply(&self, input: &I, observation: &mut Observation) -> ConversionResult<()>;
}

/// A builder registered with the composer, tagged by the input it accepts
pub enum RegisteredBuilder {
    /// Needs nothing but the Observation; runs for any input
    Any(Box<dyn ExtensionBuilder<()>>),
    Header(Box<dyn ExtensionBuilder<SampleHeader>>),
    Revision(Box<dyn ExtensionBuilder<SourceRevision>>),
}

impl RegisteredBuilder {
    fn url(&self) -> String {
        match self {
            RegisteredBuilder::Any(b) => b.url(),
            RegisteredBuilder::Header(b) => b.url(),
            RegisteredBuilder::Revision(b) => b.url(),
        }
    }
}

impl std::fmt::Debug for RegisteredBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            RegisteredBuilder::Any(_) => "Any",
            RegisteredBuilder::Header(_) => "Header",
            RegisteredBuilder::Revision(_) => "Revision",
        };
        f.debug_struct("RegisteredBuilder")
            .field("input", &kind)
            .field("url", &self.url())
            .finish()
    }
}

/// Input handed to the composer
#[derive(Debug, Clone, Copy)]
pub enum ExtensionInput<'a> {
    None,
    Header(&'a SampleHeader),
    Revision(&'a SourceRevision),
}

impl ExtensionInput<'_> {
    fn kind(&self) -> &'static str {
        match self {
            ExtensionInput::None => "no input",
            ExtensionInput::Header(_) => "a sample header",
            ExtensionInput::Revision(_) => "a source revision",
        }
    }
}

/// Which standard builders to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardExtensions {
    pub source_device: bool,
    pub source_revision: bool,
    pub absolute_time_range: bool,
    pub metadata: bool,
}

impl Default for StandardExtensions {
    fn default() -> Self {
        Self {
            source_device: true,
            source_revision: true,
            absolute_time_range: true,
            metadata: true,
        }
    }
}

#[derive(Debug)]
struct Registration {
    builder: RegisteredBuilder,
    required: bool,
}

/// Ordered list of extension builders
#[derive(Debug, Default)]
pub struct ExtensionComposer {
    registrations: Vec<Registration>,
}

impl ExtensionComposer {
    /// An empty composer
    pub fn new() -> Self {
        Self::default()
    }

    /// Source device, source revision, absolute time range and metadata
    pub fn standard() -> Self {
        Self::from_selection(StandardExtensions::default())
    }

    /// The standard chain restricted to the selected builders
    ///
    /// Without a mapping configuration the metadata builder skips session
    /// estimates; see [`ExtensionComposer::for_mappings`].
    pub fn from_selection(selection: StandardExtensions) -> Self {
        Self::select(selection, MetadataExtension::new())
    }

    /// Like [`ExtensionComposer::from_selection`], resolving session
    /// estimates against `mappings`
    pub fn for_mappings(selection: StandardExtensions, mappings: Arc<MappingConfiguration>) -> Self {
        Self::select(selection, MetadataExtension::with_mappings(mappings))
    }

    fn select(selection: StandardExtensions, metadata: MetadataExtension) -> Self {
        let mut composer = Self::new();
        if selection.source_device {
            composer = composer.register(RegisteredBuilder::Header(Box::new(SourceDeviceExtension)), false);
        }
        if selection.source_revision {
            composer = composer.register(
                RegisteredBuilder::Header(Box::new(SampleSourceRevisionExtension)),
                false,
            );
        }
        if selection.absolute_time_range {
            composer = composer.register(
                RegisteredBuilder::Header(Box::new(AbsoluteTimeRangeExtension)),
                false,
            );
        }
        if selection.metadata {
            composer = composer.register(RegisteredBuilder::Header(Box::new(metadata)), false);
        }
        composer
    }

    /// Adds a builder at the end of the chain
    ///
    /// A `required` builder fails the conversion when handed an input it
    /// cannot use; otherwise mismatched inputs are skipped.
    pub fn register(mut self, builder: RegisteredBuilder, required: bool) -> Self {
        self.registrations.push(Registration { builder, required });
        self
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Urls of the registered builders, in order
    pub fn urls(&self) -> Vec<String> {
        self.registrations.iter().map(|r| r.builder.url()).collect()
    }

    /// Runs every builder whose input type matches `input`
    ///
    /// # Errors
    ///
    /// [`ConversionError::NotSupported`] when a required builder is handed a
    /// mismatched input, or whatever a builder itself returns.
    pub fn apply(&self, input: ExtensionInput<'_>, observation: &mut Observation) -> ConversionResult<()> {
        for registration in &self.registrations {
            let applied = match (&registration.builder, input) {
                (RegisteredBuilder::Any(b), _) => b.apply(&(), observation).map(|_| true)?,
                (RegisteredBuilder::Header(b), ExtensionInput::Header(header)) => {
                    b.apply(header, observation).map(|_| true)?
                }
                (RegisteredBuilder::Revision(b), ExtensionInput::Revision(revision)) => {
                    b.apply(revision, observation).map(|_| true)?
                }
                _ => false,
            };
            if !applied {
                if registration.required {
                    return Err(ConversionError::not_supported(format!(
                        "extension {} cannot be built from {}",
                        registration.builder.url(),
                        input.kind()
                    )));
                }
                tracing::trace!(url = %registration.builder.url(), "Skipping extension builder for mismatched input");
            }
        }
        Ok(())
    }
}
