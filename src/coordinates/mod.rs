//! Length-typed distances and cartesian points
//!
//! - [`distance`]: [`Distance`], a scalar or array length built from a value,
//!   a quantity, a redshift, or a distance modulus
//! - [`cartesian`]: [`CartesianPoint`], one or many 3-vectors carrying a length unit
//! - [`angle`]: [`Angle`], [`Latitude`] and [`Longitude`]
//! - [`transforms`]: cartesian ↔ spherical conversions for scalars and arrays

pub mod angle;
pub mod cartesian;
pub mod distance;
pub mod transforms;

pub use angle::{Angle, Latitude, Longitude};
pub use cartesian::{CartesianPoint, CartesianPointBuilder, Component, IntoComponent};
pub use distance::{Distance, DistanceBuilder, DistanceInput};
pub use transforms::{
    cartesian_to_spherical, cartesian_to_spherical_array, spherical_to_cartesian,
    spherical_to_cartesian_array,
};

use crate::units::{IntoUnit, Unit, UnitsError, DIMENSIONLESS, KILOPARSEC};

/// Resolve `unit` and check that it measures length
///
/// With `allow_dimensionless`, the dimensionless unit is accepted as well.
pub fn validate_length_unit(unit: impl IntoUnit, allow_dimensionless: bool) -> Result<Unit, UnitsError> {
    let unit = unit.into_unit()?;
    if !unit.is_equivalent(&KILOPARSEC) && !(allow_dimensionless && unit == DIMENSIONLESS) {
        return Err(UnitsError::NotLength(unit));
    }
    Ok(unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{AU, DEGREE, KILOMETER, MAGNITUDE, PARSEC};
    use rstest::rstest;

    #[rstest]
    #[case(PARSEC)]
    #[case(KILOMETER)]
    #[case(AU)]
    fn test_length_units_pass(#[case] unit: Unit) {
        assert_eq!(validate_length_unit(unit, false), Ok(unit));
    }

    #[test]
    fn test_unit_names_are_resolved() {
        assert_eq!(validate_length_unit("Mpc", false).unwrap().name(), "Mpc");
        assert_eq!(
            validate_length_unit("parsnip", false),
            Err(UnitsError::UnknownUnit("parsnip".to_string()))
        );
    }

    #[rstest]
    #[case(DEGREE)]
    #[case(MAGNITUDE)]
    #[case(DIMENSIONLESS)]
    fn test_non_length_units_fail(#[case] unit: Unit) {
        assert_eq!(validate_length_unit(unit, false), Err(UnitsError::NotLength(unit)));
    }

    #[test]
    fn test_dimensionless_when_allowed() {
        assert_eq!(validate_length_unit(DIMENSIONLESS, true), Ok(DIMENSIONLESS));
        // Only the dimensionless unit gets the exemption
        assert_eq!(
            validate_length_unit(DEGREE, true),
            Err(UnitsError::NotLength(DEGREE))
        );
    }

    #[test]
    fn test_error_message() {
        let err = validate_length_unit("deg", false).unwrap_err();
        assert_eq!(err.to_string(), "Unit \"deg\" is not a length type");
    }
}
