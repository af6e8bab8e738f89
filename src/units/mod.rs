//! # Physical Units
//!
//! A deliberately small unit system: every [`Unit`] has a single physical
//! [`Dimension`] and a scale factor relative to that dimension's base unit
//! (metre, radian, second, or 1 for magnitudes and pure numbers).
//!
//! Composite units (products, quotients, powers) are not modelled. Two units
//! are equivalent exactly when they share a dimension, and converting between
//! equivalent units is a single multiplication.
//!
//! ```rust
//! use astrodist::units::{Unit, KILOPARSEC, PARSEC};
//!
//! let mpc = Unit::parse("Mpc").unwrap();
//! assert!(mpc.is_equivalent(&PARSEC));
//! let factor = KILOPARSEC.conversion_factor(&PARSEC).unwrap();
//! assert!((factor - 1e3).abs() < 1e-9);
//! ```

pub mod quantity;

pub use quantity::Quantity;

use crate::constants::{AU_M, DEG2RAD, LIGHT_YEAR_M, PARSEC_M};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Error type for unit resolution and conversion
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitsError {
    #[error("Unit \"{0}\" is not a length type")]
    NotLength(Unit),

    #[error("Units do not match: {0} and {1}")]
    Mismatch(Unit, Unit),

    #[error("Cannot convert from \"{from}\" to \"{to}\": incompatible dimensions")]
    Incompatible { from: Unit, to: Unit },

    #[error("No unit was provided to {0}")]
    MissingUnit(&'static str),

    #[error("Unknown unit \"{0}\"")]
    UnknownUnit(String),
}

/// Physical dimension of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Length,
    Angle,
    Time,
    /// Logarithmic astronomical magnitude
    Magnitude,
    Dimensionless,
}

/// A named unit of measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Unit {
    name: &'static str,
    dimension: Dimension,
    /// Size of one of this unit in the dimension's base unit
    scale: f64,
}

pub const METER: Unit = Unit::new("m", Dimension::Length, 1.0);
pub const KILOMETER: Unit = Unit::new("km", Dimension::Length, 1e3);
pub const AU: Unit = Unit::new("AU", Dimension::Length, AU_M);
pub const LIGHT_YEAR: Unit = Unit::new("lyr", Dimension::Length, LIGHT_YEAR_M);
pub const PARSEC: Unit = Unit::new("pc", Dimension::Length, PARSEC_M);
pub const KILOPARSEC: Unit = Unit::new("kpc", Dimension::Length, PARSEC_M * 1e3);
pub const MEGAPARSEC: Unit = Unit::new("Mpc", Dimension::Length, PARSEC_M * 1e6);
pub const GIGAPARSEC: Unit = Unit::new("Gpc", Dimension::Length, PARSEC_M * 1e9);
pub const RADIAN: Unit = Unit::new("rad", Dimension::Angle, 1.0);
pub const DEGREE: Unit = Unit::new("deg", Dimension::Angle, DEG2RAD);
pub const SECOND: Unit = Unit::new("s", Dimension::Time, 1.0);
pub const MAGNITUDE: Unit = Unit::new("mag", Dimension::Magnitude, 1.0);
pub const DIMENSIONLESS: Unit = Unit::new("", Dimension::Dimensionless, 1.0);

/// Canonical units paired with every name they may be parsed from
const UNIT_ALIASES: &[(Unit, &[&str])] = &[
    (METER, &["m", "meter", "meters", "metre"]),
    (KILOMETER, &["km", "kilometer", "kilometers", "kilometre"]),
    (AU, &["AU", "au", "astronomical_unit"]),
    (LIGHT_YEAR, &["lyr", "ly", "lightyear", "light_year"]),
    (PARSEC, &["pc", "parsec", "parsecs"]),
    (KILOPARSEC, &["kpc", "kiloparsec", "kiloparsecs"]),
    (MEGAPARSEC, &["Mpc", "megaparsec", "megaparsecs"]),
    (GIGAPARSEC, &["Gpc", "gigaparsec", "gigaparsecs"]),
    (RADIAN, &["rad", "radian", "radians"]),
    (DEGREE, &["deg", "degree", "degrees"]),
    (SECOND, &["s", "second", "seconds"]),
    (MAGNITUDE, &["mag", "magnitude"]),
    (DIMENSIONLESS, &["", "dimensionless"]),
];

lazy_static! {
    /// Map from every accepted unit name to its canonical unit
    static ref UNITS_BY_NAME: HashMap<&'static str, Unit> = {
        let mut m = HashMap::new();
        for &(unit, names) in UNIT_ALIASES.iter() {
            for &name in names.iter() {
                m.insert(name, unit);
            }
        }
        m
    };
}

impl Unit {
    const fn new(name: &'static str, dimension: Dimension, scale: f64) -> Self {
        Unit {
            name,
            dimension,
            scale,
        }
    }

    /// Resolve a unit from its name or one of its aliases
    ///
    /// Surrounding whitespace is ignored; the lookup is otherwise
    /// case-sensitive so that `Mpc` and `mpc` cannot be confused with milli-
    /// and mega- prefixes.
    pub fn parse(name: &str) -> Result<Unit, UnitsError> {
        UNITS_BY_NAME
            .get(name.trim())
            .copied()
            .ok_or_else(|| UnitsError::UnknownUnit(name.to_string()))
    }

    /// Canonical short name, e.g. `"Mpc"`
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Whether values in `self` can be converted to `other`
    pub fn is_equivalent(&self, other: &Unit) -> bool {
        self.dimension == other.dimension
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dimension == Dimension::Dimensionless
    }

    /// Factor that converts a value in `self` into a value in `target`
    pub fn conversion_factor(&self, target: &Unit) -> Result<f64, UnitsError> {
        if !self.is_equivalent(target) {
            return Err(UnitsError::Incompatible {
                from: *self,
                to: *target,
            });
        }
        Ok(self.scale_to(target))
    }

    /// Ratio of scales, without checking that the dimensions agree
    pub(crate) fn scale_to(&self, target: &Unit) -> f64 {
        if self.scale == target.scale {
            return 1.0;
        }
        self.scale / target.scale
    }
}

/// A unit given either directly or by name
pub trait IntoUnit {
    fn into_unit(self) -> Result<Unit, UnitsError>;
}

impl IntoUnit for Unit {
    fn into_unit(self) -> Result<Unit, UnitsError> {
        Ok(self)
    }
}

impl IntoUnit for &Unit {
    fn into_unit(self) -> Result<Unit, UnitsError> {
        Ok(*self)
    }
}

impl IntoUnit for &str {
    fn into_unit(self) -> Result<Unit, UnitsError> {
        Unit::parse(self)
    }
}

impl IntoUnit for String {
    fn into_unit(self) -> Result<Unit, UnitsError> {
        Unit::parse(&self)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            write!(f, "dimensionless")
        } else {
            write!(f, "{}", self.name)
        }
    }
}

impl std::str::FromStr for Unit {
    type Err = UnitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::parse(s)
    }
}

impl TryFrom<String> for Unit {
    type Error = UnitsError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Unit::parse(&name)
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case("pc", PARSEC)]
    #[case("parsec", PARSEC)]
    #[case("kpc", KILOPARSEC)]
    #[case("Mpc", MEGAPARSEC)]
    #[case(" megaparsec ", MEGAPARSEC)]
    #[case("lightyear", LIGHT_YEAR)]
    #[case("km", KILOMETER)]
    #[case("rad", RADIAN)]
    #[case("mag", MAGNITUDE)]
    #[case("", DIMENSIONLESS)]
    fn test_parse_aliases(#[case] name: &str, #[case] expected: Unit) {
        assert_eq!(Unit::parse(name).unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            Unit::parse("furlong"),
            Err(UnitsError::UnknownUnit("furlong".to_string()))
        );
        // No case folding: "mpc" is not a megaparsec
        assert!(Unit::parse("mpc").is_err());
    }

    #[test]
    fn test_equivalence() {
        assert!(PARSEC.is_equivalent(&KILOMETER));
        assert!(LIGHT_YEAR.is_equivalent(&AU));
        assert!(!PARSEC.is_equivalent(&RADIAN));
        assert!(!DIMENSIONLESS.is_equivalent(&METER));
        assert!(!MAGNITUDE.is_equivalent(&DIMENSIONLESS));
    }

    #[test]
    fn test_conversion_factors() {
        assert_relative_eq!(MEGAPARSEC.conversion_factor(&KILOPARSEC).unwrap(), 1e3);
        assert_eq!(PARSEC.conversion_factor(&PARSEC).unwrap(), 1.0);
        assert_relative_eq!(
            PARSEC.conversion_factor(&KILOMETER).unwrap(),
            3.085_677_581_491_367e13,
            max_relative = 1e-15
        );
        assert_relative_eq!(
            DEGREE.conversion_factor(&RADIAN).unwrap(),
            std::f64::consts::PI / 180.0
        );
    }

    #[test]
    fn test_incompatible_conversion() {
        let err = PARSEC.conversion_factor(&SECOND).unwrap_err();
        assert_eq!(
            err,
            UnitsError::Incompatible {
                from: PARSEC,
                to: SECOND
            }
        );
        assert!(err.to_string().contains("incompatible"));
    }

    #[test]
    fn test_serde_uses_unit_name() {
        let json = serde_json::to_string(&KILOPARSEC).unwrap();
        assert_eq!(json, "\"kpc\"");

        let parsed: Unit = serde_json::from_str("\"lyr\"").unwrap();
        assert_eq!(parsed, LIGHT_YEAR);

        assert!(serde_json::from_str::<Unit>("\"cubit\"").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(MEGAPARSEC.to_string(), "Mpc");
        assert_eq!(DIMENSIONLESS.to_string(), "dimensionless");
    }
}
