//! Unit algebra and the unit/coding resolver
//!
//! HealthKit unit strings (`count/min`, `mg/dL`, `kcal/hr*kg`,
//! `mmol<180.1558800000541>/L`) are parsed into a scale factor over a vector
//! of base dimensions. Two expressions convert into each other exactly when
//! their dimension vectors match.

mod catalog;
mod parser;

use std::fmt;
use std::str::FromStr;

use crate::domain::errors::ConversionError;
use crate::domain::record::Quantity;
use crate::domain::result::ConversionResult;
use crate::mapping::MappedUnit;

use catalog::DIMENSION_COUNT;

/// Exponents of the base dimensions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Dimensions(pub(crate) [i8; DIMENSION_COUNT]);

impl Dimensions {
    pub(crate) const fn single(index: usize) -> Self {
        let mut exps = [0i8; DIMENSION_COUNT];
        exps[index] = 1;
        Self(exps)
    }

    fn zip(&self, other: &Self, op: impl Fn(i8, i8) -> Option<i8>) -> Option<Self> {
        let mut out = [0i8; DIMENSION_COUNT];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = op(self.0[i], other.0[i])?;
        }
        Some(Self(out))
    }

    /// `None` when an exponent leaves the `i8` range
    fn product_with(&self, other: &Self) -> Option<Self> {
        self.zip(other, i8::checked_add)
    }

    fn quotient_with(&self, other: &Self) -> Option<Self> {
        self.zip(other, i8::checked_sub)
    }

    fn scale(&self, by: i8) -> Option<Self> {
        let mut out = [0i8; DIMENSION_COUNT];
        for (slot, e) in out.iter_mut().zip(self.0) {
            *slot = e.checked_mul(by)?;
        }
        Some(Self(out))
    }

    /// True for pure numbers such as `count` or `%`
    pub fn is_dimensionless(&self) -> bool {
        self.0.iter().all(|e| *e == 0)
    }
}

/// A parsed unit expression
#[derive(Debug, Clone, PartialEq)]
pub struct UnitExpr {
    expression: String,
    factor: f64,
    dims: Dimensions,
    offset: Option<f64>,
}

impl UnitExpr {
    /// Parses a HealthKit unit string
    ///
    /// # Errors
    ///
    /// Returns a diagnostic describing the first unparseable token.
    pub fn parse(expression: &str) -> Result<Self, String> {
        parser::parse(expression)
    }

    /// The expression as written (trimmed)
    pub fn as_str(&self) -> &str {
        &self.expression
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Whether values can be converted between the two units
    pub fn is_compatible(&self, other: &UnitExpr) -> bool {
        self.dims == other.dims
    }

    /// Converts `value` expressed in `self` into `target`
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::InvalidValue`] when the dimensions differ.
    pub fn convert(&self, value: f64, target: &UnitExpr) -> ConversionResult<f64> {
        if !self.is_compatible(target) {
            return Err(ConversionError::invalid_value(format!(
                "cannot convert '{}' to '{}': incompatible dimensions",
                self.expression, target.expression
            )));
        }
        if self.expression == target.expression {
            return Ok(value);
        }
        let base = value * self.factor + self.offset.unwrap_or(0.0);
        Ok((base - target.offset.unwrap_or(0.0)) / target.factor)
    }
}

impl fmt::Display for UnitExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

impl FromStr for UnitExpr {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Converts a raw value into a mapped unit and packages it as a FHIR Quantity
///
/// The Quantity's `unit` is the mapping's alias when present, otherwise its
/// HealthKit unit; `system` and `code` are copied only when the mapping has them.
///
/// # Errors
///
/// * [`ConversionError::NotSupported`] when `mapping` is `None`
/// * [`ConversionError::InvalidValue`] when `source_unit` is not parseable or
///   not convertible into the mapped unit
pub fn resolve_quantity(
    value: f64,
    source_unit: &str,
    mapping: Option<&MappedUnit>,
) -> ConversionResult<Quantity> {
    let mapping = mapping
        .ok_or_else(|| ConversionError::not_supported(format!("no unit mapping for '{source_unit}'")))?;
    let source = UnitExpr::parse(source_unit)
        .map_err(|e| ConversionError::invalid_value(format!("source unit: {e}")))?;
    let target = UnitExpr::parse(&mapping.hkunit)
        .map_err(|e| ConversionError::invalid_value(format!("mapped unit: {e}")))?;
    let converted = source.convert(value, &target)?;
    Ok(Quantity {
        value: converted,
        unit: Some(mapping.display_unit().to_string()),
        system: mapping.system.clone(),
        code: mapping.code.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(value: f64, from: &str, to: &str) -> f64 {
        UnitExpr::parse(from)
            .unwrap()
            .convert(value, &UnitExpr::parse(to).unwrap())
            .unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = 1e-9 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_identity() {
        assert_eq!(convert(84.0, "count/min", "count/min"), 84.0);
    }

    #[test]
    fn test_rate_conversion() {
        assert_close(convert(1.5, "count/s", "count/min"), 90.0);
    }

    #[test]
    fn test_mass_conversion() {
        assert_close(convert(1.0, "kg", "lb"), 2.204_622_621_848_776);
        assert_close(convert(500.0, "mcg", "mg"), 0.5);
    }

    #[test]
    fn test_healthkit_denominator_rule() {
        // everything after the first '/' divides
        assert_close(convert(1.0, "mL/kg*min", "mL/(kg*min)"), 1.0);
        assert_close(convert(60.0, "kcal/hr*kg", "kcal/(kg*min)"), 1.0);
    }

    #[test]
    fn test_temperature_is_affine() {
        assert_close(convert(100.0, "degC", "degF"), 212.0);
        assert_close(convert(98.6, "degF", "degC"), 37.0);
        assert_close(convert(0.0, "degC", "K"), 273.15);
    }

    #[test]
    fn test_pressure() {
        assert_close(convert(1.0, "mmHg", "Pa"), 133.322387415);
        assert_close(convert(1.0, "atm", "mmHg"), 101_325.0 / 133.322387415);
    }

    #[test]
    fn test_molar_mass_glucose() {
        // 5.5 mmol/L glucose is about 99.09 mg/dL
        let mg_dl = convert(5.5, "mmol<180.1558800000541>/L", "mg/dL");
        assert!((mg_dl - 99.0857).abs() < 1e-3, "{mg_dl}");
    }

    #[test]
    fn test_exponents() {
        assert_close(convert(1.0, "m^2", "cm^2"), 10_000.0);
        assert!(UnitExpr::parse("m2").is_err());
    }

    #[test]
    fn test_percent_is_dimensionless() {
        assert_close(convert(0.5, "count", "%"), 50.0);
        assert!(UnitExpr::parse("%").unwrap().dimensions().is_dimensionless());
    }

    #[test]
    fn test_incompatible_is_invalid_value() {
        let err = UnitExpr::parse("kg")
            .unwrap()
            .convert(1.0, &UnitExpr::parse("m").unwrap())
            .unwrap_err();
        assert!(matches!(err, ConversionError::InvalidValue(_)));
    }

    #[test]
    fn test_sound_levels_only_convert_to_themselves() {
        let spl = UnitExpr::parse("dBASPL").unwrap();
        let hl = UnitExpr::parse("dBHL").unwrap();
        assert!(!spl.is_compatible(&hl));
        assert!(!spl.is_compatible(&UnitExpr::parse("count").unwrap()));
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "furlong", "m/", "(m", "m^", "m^0", "mol<abc>", "g<180>"] {
            assert!(UnitExpr::parse(bad).is_err(), "'{bad}' should not parse");
        }
    }

    #[test]
    fn test_exponent_overflow_is_an_error() {
        let nested = UnitExpr::parse("((m^9)^9)^9").unwrap_err();
        assert!(nested.contains("out of range"), "{nested}");

        let long_product = vec!["m"; 130].join("*");
        let err = UnitExpr::parse(&long_product).unwrap_err();
        assert!(err.contains("out of range"), "{err}");

        let long_quotient = format!("count/{}", vec!["s"; 130].join("*"));
        assert!(UnitExpr::parse(&long_quotient).is_err());

        // Still within range
        assert!(UnitExpr::parse("(m^9)^9").is_ok());
    }

    #[test]
    fn test_resolve_quantity_with_alias() {
        let mapping = MappedUnit {
            hkunit: "count/min".to_string(),
            unit_alias: Some("beats/minute".to_string()),
            system: Some("http://unitsofmeasure.org".to_string()),
            code: Some("/min".to_string()),
        };
        let q = resolve_quantity(84.0, "count/min", Some(&mapping)).unwrap();
        assert_eq!(q.value, 84.0);
        assert_eq!(q.unit.as_deref(), Some("beats/minute"));
        assert_eq!(q.code.as_deref(), Some("/min"));
    }

    #[test]
    fn test_resolve_quantity_without_system() {
        let mapping = MappedUnit {
            hkunit: "count".to_string(),
            unit_alias: Some("steps".to_string()),
            system: None,
            code: None,
        };
        let q = resolve_quantity(1000.0, "count", Some(&mapping)).unwrap();
        assert!(q.system.is_none());
        assert!(q.code.is_none());
    }

    #[test]
    fn test_resolve_quantity_missing_mapping() {
        let err = resolve_quantity(1.0, "count", None).unwrap_err();
        assert!(matches!(err, ConversionError::NotSupported(_)));
    }
}
