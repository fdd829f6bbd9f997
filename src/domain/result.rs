//! Result type alias for hkfhir
//!
//! Library operations return [`HkFhirError`] unless they sit on the per-sample
//! conversion path, which returns [`ConversionResult`].

use super::errors::{ConversionError, HkFhirError};

/// Result type alias for hkfhir operations
///
/// # Examples
///
/// ```
/// use hkfhir::domain::result::Result;
/// use hkfhir::domain::errors::HkFhirError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(HkFhirError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, HkFhirError>;

/// Result of converting one sample
pub type ConversionResult<T> = std::result::Result<T, ConversionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> ConversionResult<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_conversion_result_err() {
        let result: ConversionResult<i32> = Err(ConversionError::invalid_value("7"));
        assert!(result.is_err());
    }
}
