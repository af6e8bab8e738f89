//! # Angle Representation Module
//!
//! This module provides array-valued angles that keep the unit they were
//! created in, plus the two spherical angle types produced when converting a
//! cartesian point: [`Latitude`] and [`Longitude`].
//!
//! ## Internal Storage
//!
//! An [`Angle`] wraps a [`Quantity`] whose unit is angular (radians or
//! degrees). Values are stored exactly as given; conversion only happens when
//! explicitly requested via `to_degrees()` or `to_radians()`, so reading back
//! the original unit never loses precision.
//!
//! ## Examples
//!
//! ```rust
//! use astrodist::coordinates::angle::Angle;
//!
//! // Stored exactly as 45.0 degrees
//! let angle = Angle::from_degrees(45.0).unwrap();
//! assert_eq!(angle.to_degrees().as_slice().unwrap(), &[45.0]);
//! assert!((angle.to_radians().sum() - std::f64::consts::FRAC_PI_4).abs() < 1e-15);
//! ```

use crate::constants::TAU;
use crate::errors::{CoordinateError, Result};
use crate::numeric::IntoNumeric;
use crate::units::{Dimension, Quantity, Unit, UnitsError, DEGREE, RADIAN};
use ndarray::ArrayD;
use std::f64::consts::FRAC_PI_2;

/// An angular measurement, scalar or array, in radians or degrees
#[derive(Debug, Clone, PartialEq)]
pub struct Angle {
    quantity: Quantity,
}

impl Angle {
    /// Wrap a quantity, which must carry an angular unit
    pub fn new(quantity: Quantity) -> Result<Self> {
        let unit = quantity.unit();
        if unit.dimension() != Dimension::Angle {
            return Err(UnitsError::Incompatible {
                from: unit,
                to: RADIAN,
            }
            .into());
        }
        Ok(Angle { quantity })
    }

    /// Creates an angle from values in radians
    pub fn from_radians(values: impl IntoNumeric) -> Result<Self> {
        Ok(Angle {
            quantity: Quantity::from_array(values.into_numeric()?, RADIAN),
        })
    }

    /// Creates an angle from values in degrees
    pub fn from_degrees(values: impl IntoNumeric) -> Result<Self> {
        Ok(Angle {
            quantity: Quantity::from_array(values.into_numeric()?, DEGREE),
        })
    }

    /// The unit the angle was created in
    pub fn unit(&self) -> Unit {
        self.quantity.unit()
    }

    /// The stored values, in [`Angle::unit`]
    pub fn value(&self) -> &ArrayD<f64> {
        self.quantity.value()
    }

    /// Returns the angle in degrees
    ///
    /// Values stored in degrees are returned exactly; radians are converted
    /// with `radians * (180 / π)`.
    pub fn to_degrees(&self) -> ArrayD<f64> {
        self.in_unit(DEGREE)
    }

    /// Returns the angle in radians
    ///
    /// Values stored in radians are returned exactly; degrees are converted
    /// with `degrees * (π / 180)`.
    pub fn to_radians(&self) -> ArrayD<f64> {
        self.in_unit(RADIAN)
    }

    fn in_unit(&self, unit: Unit) -> ArrayD<f64> {
        self.quantity.equivalent_value(unit)
    }

    pub fn as_quantity(&self) -> &Quantity {
        &self.quantity
    }
}

/// Latitude (elevation) in `[-90°, 90°]`
#[derive(Debug, Clone, PartialEq)]
pub struct Latitude(Angle);

impl Latitude {
    /// Create a latitude, rejecting any value outside `[-π/2, π/2]`
    ///
    /// NaN is not outside the range and passes through.
    pub fn new(angle: Angle) -> Result<Self> {
        if let Some(bad) = angle.to_radians().iter().find(|&&v| v < -FRAC_PI_2 || v > FRAC_PI_2) {
            return Err(CoordinateError::InvalidArguments(format!(
                "latitude angle(s) must be within -90 deg <= angle <= 90 deg, got {} rad",
                bad
            )));
        }
        Ok(Latitude(angle))
    }

    pub fn angle(&self) -> &Angle {
        &self.0
    }

    pub fn to_radians(&self) -> ArrayD<f64> {
        self.0.to_radians()
    }

    pub fn to_degrees(&self) -> ArrayD<f64> {
        self.0.to_degrees()
    }
}

/// Longitude (azimuth), wrapped into `[0°, 360°)`
#[derive(Debug, Clone, PartialEq)]
pub struct Longitude(Angle);

impl Longitude {
    /// Create a longitude, wrapping every value into one full turn
    pub fn new(angle: Angle) -> Self {
        let unit = angle.unit();
        let full_turn = if unit == DEGREE { 360.0 } else { TAU };
        let wrapped = angle.quantity.mapv(|v| wrap(v, full_turn));
        Longitude(Angle { quantity: wrapped })
    }

    pub fn angle(&self) -> &Angle {
        &self.0
    }

    pub fn to_radians(&self) -> ArrayD<f64> {
        self.0.to_radians()
    }

    pub fn to_degrees(&self) -> ArrayD<f64> {
        self.0.to_degrees()
    }
}

/// Wrap `v` into `[0, full_turn)`
fn wrap(v: f64, full_turn: f64) -> f64 {
    let wrapped = v.rem_euclid(full_turn);
    // rem_euclid can round up to exactly full_turn for tiny negative inputs
    if wrapped >= full_turn {
        0.0
    } else {
        wrapped
    }
}
