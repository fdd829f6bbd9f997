//! Unit atoms and metric prefixes
//!
//! Every atom is expressed as a factor times a product of base dimensions.
//! Factors are relative to kilogram, metre, second, kelvin, ampere, mole and
//! candela. Logarithmic and arbitrary units get a private dimension so they
//! only ever convert to themselves.

use super::Dimensions;

pub(crate) const MASS: usize = 0;
pub(crate) const LENGTH: usize = 1;
pub(crate) const TIME: usize = 2;
pub(crate) const TEMPERATURE: usize = 3;
pub(crate) const CURRENT: usize = 4;
pub(crate) const AMOUNT: usize = 5;
pub(crate) const LUMINOUS: usize = 6;
pub(crate) const INTERNATIONAL_UNIT: usize = 7;
pub(crate) const SOUND_PRESSURE: usize = 8;
pub(crate) const HEARING_LEVEL: usize = 9;
pub(crate) const EFFORT_SCORE: usize = 10;

/// Number of tracked dimensions
pub(crate) const DIMENSION_COUNT: usize = 11;

/// A unit atom
#[derive(Debug, Clone, Copy)]
pub(crate) struct Atom {
    /// Multiplier into base units
    pub factor: f64,
    /// Exponent per base dimension
    pub dims: Dimensions,
    /// Additive offset into kelvin, only for absolute temperature scales
    pub offset: f64,
    /// Whether metric prefixes may be attached
    pub prefixable: bool,
}

const fn dims(pairs: &[(usize, i8)]) -> Dimensions {
    let mut exps = [0i8; DIMENSION_COUNT];
    let mut i = 0;
    while i < pairs.len() {
        exps[pairs[i].0] = pairs[i].1;
        i += 1;
    }
    Dimensions(exps)
}

const fn atom(factor: f64, d: Dimensions, prefixable: bool) -> Atom {
    Atom {
        factor,
        dims: d,
        offset: 0.0,
        prefixable,
    }
}

const NONE: Dimensions = Dimensions([0; DIMENSION_COUNT]);
const KG: Dimensions = dims(&[(MASS, 1)]);
const M: Dimensions = dims(&[(LENGTH, 1)]);
const M3: Dimensions = dims(&[(LENGTH, 3)]);
const S: Dimensions = dims(&[(TIME, 1)]);
const ENERGY: Dimensions = dims(&[(MASS, 1), (LENGTH, 2), (TIME, -2)]);
const PRESSURE: Dimensions = dims(&[(MASS, 1), (LENGTH, -1), (TIME, -2)]);
const POWER: Dimensions = dims(&[(MASS, 1), (LENGTH, 2), (TIME, -3)]);
const VOLTAGE: Dimensions = dims(&[(MASS, 1), (LENGTH, 2), (TIME, -3), (CURRENT, -1)]);
const CONDUCTANCE: Dimensions = dims(&[(MASS, -1), (LENGTH, -2), (TIME, 3), (CURRENT, 2)]);
const ILLUMINANCE: Dimensions = dims(&[(LUMINOUS, 1), (LENGTH, -2)]);

const POUND: f64 = 0.45359237;
const INCH: f64 = 0.0254;
const CALORIE: f64 = 4.184;
const MMHG: f64 = 133.322387415;

/// Looks up an atom by its exact symbol
pub(crate) fn lookup_atom(symbol: &str) -> Option<Atom> {
    let found = match symbol {
        // mass
        "g" => atom(1e-3, KG, true),
        "lb" => atom(POUND, KG, false),
        "oz" => atom(POUND / 16.0, KG, false),
        "st" => atom(POUND * 14.0, KG, false),
        // length
        "m" => atom(1.0, M, true),
        "in" => atom(INCH, M, false),
        "ft" => atom(INCH * 12.0, M, false),
        "yd" => atom(INCH * 36.0, M, false),
        "mi" => atom(1609.344, M, false),
        // volume
        "L" | "l" => atom(1e-3, M3, true),
        "fl_oz_us" => atom(29.5735295625e-6, M3, false),
        "fl_oz_imp" => atom(28.4130625e-6, M3, false),
        "cup_us" => atom(236.5882365e-6, M3, false),
        "cup_imp" => atom(284.130625e-6, M3, false),
        "pt_us" => atom(473.176473e-6, M3, false),
        "pt_imp" => atom(568.26125e-6, M3, false),
        // time
        "s" => atom(1.0, S, true),
        "min" => atom(60.0, S, false),
        "hr" => atom(3600.0, S, false),
        "d" => atom(86400.0, S, false),
        // energy
        "J" => atom(1.0, ENERGY, true),
        "cal" => atom(CALORIE, ENERGY, true),
        "Cal" | "kcal" => atom(CALORIE * 1000.0, ENERGY, false),
        // temperature
        "K" => atom(1.0, dims(&[(TEMPERATURE, 1)]), false),
        "degC" => Atom {
            factor: 1.0,
            dims: dims(&[(TEMPERATURE, 1)]),
            offset: 273.15,
            prefixable: false,
        },
        "degF" => Atom {
            factor: 5.0 / 9.0,
            dims: dims(&[(TEMPERATURE, 1)]),
            offset: 459.67 * 5.0 / 9.0,
            prefixable: false,
        },
        // dimensionless
        "count" => atom(1.0, NONE, false),
        "%" => atom(0.01, NONE, false),
        // pressure
        "Pa" => atom(1.0, PRESSURE, true),
        "mmHg" => atom(MMHG, PRESSURE, false),
        "cmAq" => atom(98.0665, PRESSURE, false),
        "atm" => atom(101_325.0, PRESSURE, false),
        "inHg" => atom(3386.389, PRESSURE, false),
        // logarithmic and arbitrary
        "dBASPL" => atom(1.0, dims(&[(SOUND_PRESSURE, 1)]), false),
        "dBHL" => atom(1.0, dims(&[(HEARING_LEVEL, 1)]), false),
        "IU" => atom(1.0, dims(&[(INTERNATIONAL_UNIT, 1)]), false),
        "appleEffortScore" => atom(1.0, dims(&[(EFFORT_SCORE, 1)]), false),
        // electrical and other SI
        "S" => atom(1.0, CONDUCTANCE, true),
        "Hz" => atom(1.0, dims(&[(TIME, -1)]), true),
        "V" => atom(1.0, VOLTAGE, true),
        "W" => atom(1.0, POWER, true),
        "lx" => atom(1.0, ILLUMINANCE, true),
        "mol" => atom(1.0, dims(&[(AMOUNT, 1)]), true),
        _ => return None,
    };
    Some(found)
}

/// Metric prefixes, two-letter prefixes first so they win over their first letter
pub(crate) const PREFIXES: &[(&str, f64)] = &[
    ("mc", 1e-6),
    ("da", 1e1),
    ("p", 1e-12),
    ("n", 1e-9),
    ("u", 1e-6),
    ("m", 1e-3),
    ("c", 1e-2),
    ("d", 1e-1),
    ("h", 1e2),
    ("k", 1e3),
    ("M", 1e6),
    ("G", 1e9),
    ("T", 1e12),
];

/// Resolves a possibly prefixed symbol such as `mg` or `mcV`
pub(crate) fn resolve_symbol(symbol: &str) -> Option<Atom> {
    if let Some(found) = lookup_atom(symbol) {
        return Some(found);
    }
    PREFIXES.iter().find_map(|(prefix, scale)| {
        let rest = symbol.strip_prefix(prefix)?;
        let base = lookup_atom(rest).filter(|a| a.prefixable)?;
        Some(Atom {
            factor: base.factor * scale,
            ..base
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_atoms_win_over_prefixes() {
        // "min" is minutes, not milli-inches
        assert_eq!(resolve_symbol("min").unwrap().factor, 60.0);
        assert_eq!(resolve_symbol("mmHg").unwrap().factor, MMHG);
        assert_eq!(resolve_symbol("d").unwrap().factor, 86400.0);
    }

    #[test]
    fn test_prefixed_atoms() {
        let mg = resolve_symbol("mg").unwrap();
        assert!((mg.factor - 1e-6).abs() < 1e-18);
        let mcv = resolve_symbol("mcV").unwrap();
        assert!((mcv.factor - 1e-6).abs() < 1e-18);
        let dl = resolve_symbol("dL").unwrap();
        assert!((dl.factor - 1e-4).abs() < 1e-18);
        let kpa = resolve_symbol("kPa").unwrap();
        assert_eq!(kpa.factor, 1000.0);
    }

    #[test]
    fn test_non_prefixable_atoms_reject_prefixes() {
        assert!(resolve_symbol("klb").is_none());
        assert!(resolve_symbol("mdegC").is_none());
        assert!(resolve_symbol("kcount").is_none());
    }

    #[test]
    fn test_unknown_symbol() {
        assert!(resolve_symbol("furlong").is_none());
        assert!(resolve_symbol("").is_none());
    }
}
