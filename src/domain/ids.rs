//! Domain identifier types with validation
//!
//! HealthKit stamps every sample with a UUID. [`SampleId`] keeps that UUID
//! typed so it cannot be confused with any other string flowing through the
//! converter, and renders it the way HealthKit does (upper-case, hyphenated).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Sample identifier newtype wrapper
///
/// # Examples
///
/// ```
/// use hkfhir::domain::ids::SampleId;
/// use std::str::FromStr;
///
/// let id = SampleId::from_str("7d44b88c-4199-4bad-97dc-d78268e01398").unwrap();
/// assert_eq!(id.to_string(), "7D44B88C-4199-4BAD-97DC-D78268E01398");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SampleId(Uuid);

impl SampleId {
    /// Creates a new SampleId from a UUID string
    ///
    /// # Arguments
    ///
    /// * `id` - The sample UUID in any case, hyphenated or simple form
    ///
    /// # Returns
    ///
    /// Returns `Ok(SampleId)` if the ID parses as a UUID, `Err` otherwise
    pub fn new(id: impl AsRef<str>) -> Result<Self, String> {
        let id = id.as_ref();
        if id.trim().is_empty() {
            return Err("Sample ID cannot be empty".to_string());
        }
        Uuid::parse_str(id.trim())
            .map(Self)
            .map_err(|e| format!("Invalid sample ID '{id}': {e}"))
    }

    /// Generates a fresh random sample identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Consumes self and returns the inner UUID
    pub fn into_inner(self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for SampleId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Uuid::encode_buffer();
        f.write_str(self.0.hyphenated().encode_upper(&mut buf))
    }
}

impl FromStr for SampleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for SampleId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SampleId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}
