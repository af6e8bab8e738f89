//! Array-valued physical quantities

use super::{Unit, UnitsError, DIMENSIONLESS};
use crate::errors::{CoordinateError, Result};
use crate::numeric::{numeric_array, numeric_scalar, Element};
use lazy_static::lazy_static;
use ndarray::{Array, ArrayD, Dimension};
use regex::Regex;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

lazy_static! {
    /// `<number> [unit]`, e.g. "10 Mpc", "-3.5e2 km", "24.47mag"
    static ref QUANTITY_PATTERN: Regex =
        Regex::new(r"^\s*([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)\s*([A-Za-z_]*)\s*$")
            .expect("quantity pattern is valid");
}

/// A numeric scalar or array tagged with a unit
///
/// Scalars are stored as zero-dimensional arrays so that every operation
/// works identically for one value and for many.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    value: ArrayD<f64>,
    unit: Unit,
}

impl Quantity {
    /// Create a quantity from an array of validated numeric values
    pub fn new<T: Element, D: Dimension>(value: Array<T, D>, unit: Unit) -> Result<Self> {
        Ok(Quantity {
            value: numeric_array(value)?,
            unit,
        })
    }

    /// Create a zero-dimensional quantity
    pub fn scalar<T: Element>(value: T, unit: Unit) -> Result<Self> {
        Ok(Quantity {
            value: numeric_scalar(value)?,
            unit,
        })
    }

    /// Wrap an already-validated `f64` array
    pub fn from_array(value: ArrayD<f64>, unit: Unit) -> Self {
        Quantity { value, unit }
    }

    pub fn value(&self) -> &ArrayD<f64> {
        &self.value
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn into_parts(self) -> (ArrayD<f64>, Unit) {
        (self.value, self.unit)
    }

    pub fn shape(&self) -> &[usize] {
        self.value.shape()
    }

    /// The single value of a quantity holding exactly one element
    pub fn as_scalar(&self) -> Option<f64> {
        if self.value.len() == 1 {
            self.value.iter().next().copied()
        } else {
            None
        }
    }

    /// Convert to an equivalent unit
    pub fn to(&self, unit: Unit) -> std::result::Result<Quantity, UnitsError> {
        self.unit.conversion_factor(&unit)?;
        Ok(Quantity {
            value: self.equivalent_value(unit),
            unit,
        })
    }

    /// Values rescaled into `unit`, which must share this quantity's dimension
    ///
    /// Used by wrappers whose constructors already checked the dimension.
    pub(crate) fn equivalent_value(&self, unit: Unit) -> ArrayD<f64> {
        let factor = self.unit.scale_to(&unit);
        if factor == 1.0 {
            self.value.clone()
        } else {
            self.value.mapv(|v| v * factor)
        }
    }

    /// The numeric values expressed in `unit`
    pub fn to_value(&self, unit: Unit) -> std::result::Result<ArrayD<f64>, UnitsError> {
        Ok(self.to(unit)?.value)
    }

    /// Apply `f` to every element, keeping the unit
    pub fn mapv(&self, f: impl Fn(f64) -> f64) -> Quantity {
        Quantity {
            value: self.value.mapv(f),
            unit: self.unit,
        }
    }

    /// Elementwise sum, expressed in `self`'s unit
    pub fn try_add(&self, other: &Quantity) -> Result<Quantity> {
        self.combine(other, |a, b| a + b)
    }

    /// Elementwise difference, expressed in `self`'s unit
    pub fn try_sub(&self, other: &Quantity) -> Result<Quantity> {
        self.combine(other, |a, b| a - b)
    }

    fn combine(&self, other: &Quantity, op: impl Fn(f64, f64) -> f64) -> Result<Quantity> {
        let rhs = other.to_value(self.unit)?;
        let lhs = &self.value;
        if lhs.shape() != rhs.shape() && lhs.len() != 1 && rhs.len() != 1 {
            return Err(CoordinateError::InvalidArguments(format!(
                "operands could not be broadcast together with shapes {:?} {:?}",
                lhs.shape(),
                rhs.shape()
            )));
        }
        let value = if rhs.len() == 1 {
            let r = rhs.iter().next().copied().unwrap_or(f64::NAN);
            lhs.mapv(|a| op(a, r))
        } else if lhs.len() == 1 {
            let l = lhs.iter().next().copied().unwrap_or(f64::NAN);
            rhs.mapv(|b| op(l, b))
        } else {
            ndarray::Zip::from(lhs).and(&rhs).map_collect(|&a, &b| op(a, b))
        };
        Ok(Quantity {
            value,
            unit: self.unit,
        })
    }
}

impl Mul<f64> for Quantity {
    type Output = Quantity;

    fn mul(self, scalar: f64) -> Quantity {
        Quantity {
            value: self.value.mapv_into(|v| v * scalar),
            unit: self.unit,
        }
    }
}

impl Div<f64> for Quantity {
    type Output = Quantity;

    fn div(self, scalar: f64) -> Quantity {
        Quantity {
            value: self.value.mapv_into(|v| v / scalar),
            unit: self.unit,
        }
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        Quantity {
            value: self.value.mapv_into(|v| -v),
            unit: self.unit,
        }
    }
}

impl Add for &Quantity {
    type Output = Result<Quantity>;

    fn add(self, other: &Quantity) -> Result<Quantity> {
        self.try_add(other)
    }
}

impl Sub for &Quantity {
    type Output = Result<Quantity>;

    fn sub(self, other: &Quantity) -> Result<Quantity> {
        self.try_sub(other)
    }
}

impl FromStr for Quantity {
    type Err = CoordinateError;

    /// Parse a scalar quantity such as `"10 Mpc"`; a bare number is dimensionless
    fn from_str(s: &str) -> Result<Self> {
        let caps = QUANTITY_PATTERN
            .captures(s)
            .ok_or_else(|| CoordinateError::InvalidInput(format!("cannot parse quantity \"{}\"", s)))?;
        let value: f64 = caps[1]
            .parse()
            .map_err(|e| CoordinateError::InvalidInput(format!("{}: {}", &caps[1], e)))?;
        let unit = match caps.get(2).map(|m| m.as_str()) {
            Some(name) if !name.is_empty() => Unit::parse(name)?,
            _ => DIMENSIONLESS,
        };
        Quantity::scalar(value, unit)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_scalar() {
            Some(v) if self.value.ndim() == 0 => write!(f, "{} {}", v, self.unit),
            _ => write!(f, "{} {}", self.value, self.unit),
        }
    }
}
