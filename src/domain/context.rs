//! Error context extension trait
//!
//! Provides `.context()` and `.with_context()` for `Result<T, HkFhirError>` in the
//! spirit of `anyhow::Context`, keeping library errors typed.
//!
//! # Examples
//!
//! ```rust
//! use hkfhir::domain::Result;
//! use hkfhir::domain::context::ResultExt;
//!
//! fn read_samples(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_context(|| format!("Failed to read sample file: {}", path))
//! }
//! ```

use crate::domain::errors::HkFhirError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
pub trait ResultExt<T> {
    /// Add context to an error (evaluated eagerly)
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context to an error using a closure (evaluated only on error)
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<HkFhirError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| {
            let base_error = e.into();
            HkFhirError::Other(format!("{context}: {base_error}"))
        })
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            let base_error = e.into();
            let context = f();
            HkFhirError::Other(format!("{context}: {base_error}"))
        })
    }
}
