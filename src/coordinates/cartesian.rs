//! # Cartesian Points
//!
//! A [`CartesianPoint`] holds one or many 3D positions together with a single
//! length unit, or no unit at all.
//!
//! ## Internal Storage
//!
//! Components are stored packed in one array whose leading axis has length 3:
//! `components[0]` is x, `components[1]` is y and `components[2]` is z. A
//! single point therefore has shape `[3]` and a 4×5 grid of points has shape
//! `[3, 4, 5]`. Points built without a unit carry [`DIMENSIONLESS`].
//!
//! ## Construction
//!
//! Either pass one packed array (or quantity) whose leading axis is 3, or pass
//! x, y and z separately:
//!
//! ```rust
//! use astrodist::coordinates::CartesianPoint;
//! use astrodist::units::{Quantity, KILOPARSEC, PARSEC};
//!
//! let p = CartesianPoint::new(1.0, 2.0, 3.0, KILOPARSEC).unwrap();
//! assert_eq!(p.y().as_scalar(), Some(2.0));
//!
//! let packed = CartesianPoint::from_array(vec![1, 2, 3]).unwrap();
//! assert!(packed.unit().is_dimensionless());
//!
//! // Quantities are converted to the requested unit before assembly
//! let q = |v: f64| Quantity::scalar(v, PARSEC).unwrap();
//! let p = CartesianPoint::builder(q(1000.0)).y(q(0.0)).z(q(500.0)).unit(KILOPARSEC).build().unwrap();
//! assert!((p.z().as_scalar().unwrap() - 0.5).abs() < 1e-12);
//! ```
//!
//! ## Arithmetic
//!
//! Every elementwise operation returns a `CartesianPoint` in the unit of the
//! point it was applied to. Results computed in some other compatible unit
//! are converted back; incompatible results are an error.

use super::angle::{Angle, Latitude, Longitude};
use super::distance::{Distance, DistanceInput};
use super::transforms::cartesian_to_spherical_array;
use super::validate_length_unit;
use crate::errors::{CoordinateError, Result};
use crate::numeric::{Dtype, IntoNumeric};
use crate::units::{IntoUnit, Quantity, Unit, UnitsError, DIMENSIONLESS};
use nalgebra::Vector3;
use ndarray::{Array1, ArrayD, Axis};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// One constructor operand: plain numbers or a quantity carrying a unit
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Values(ArrayD<f64>),
    Quantity(Quantity),
}

impl Component {
    fn unit(&self) -> Option<Unit> {
        match self {
            Component::Values(_) => None,
            Component::Quantity(q) => Some(q.unit()),
        }
    }

    /// The numbers, converted to `unit` when this is a quantity and a unit is given
    fn into_values(self, unit: Option<Unit>) -> Result<ArrayD<f64>> {
        match (self, unit) {
            (Component::Values(values), _) => Ok(values),
            (Component::Quantity(q), Some(unit)) => Ok(q.to_value(unit)?),
            (Component::Quantity(q), None) => Ok(q.into_parts().0),
        }
    }
}

/// Anything accepted as a [`CartesianPoint`] operand
pub trait IntoComponent {
    fn into_component(self) -> Result<Component>;
}

impl<T: IntoNumeric> IntoComponent for T {
    fn into_component(self) -> Result<Component> {
        Ok(Component::Values(self.into_numeric()?))
    }
}

impl IntoComponent for Quantity {
    fn into_component(self) -> Result<Component> {
        Ok(Component::Quantity(self))
    }
}

impl IntoComponent for Distance {
    fn into_component(self) -> Result<Component> {
        Ok(Component::Quantity(self.into_quantity()))
    }
}

impl IntoComponent for Component {
    fn into_component(self) -> Result<Component> {
        Ok(self)
    }
}

/// One or many 3D positions in a common length unit
#[derive(Debug, Clone, PartialEq)]
pub struct CartesianPoint {
    /// Packed components, leading axis of length 3
    components: ArrayD<f64>,
    unit: Unit,
}

impl CartesianPoint {
    /// Start a builder from a packed operand, or from `x` when `y` and `z` follow
    pub fn builder(xorarr: impl IntoComponent) -> CartesianPointBuilder {
        CartesianPointBuilder {
            xorarr: xorarr.into_component(),
            y: None,
            z: None,
            unit: None,
            dtype: Dtype::default(),
        }
    }

    /// A point from separate components in `unit`
    pub fn new(
        x: impl IntoComponent,
        y: impl IntoComponent,
        z: impl IntoComponent,
        unit: impl IntoUnit,
    ) -> Result<Self> {
        Self::builder(x).y(y).z(z).unit(unit).build()
    }

    /// A point from separate components, taking the unit from any quantities
    pub fn from_xyz(x: impl IntoComponent, y: impl IntoComponent, z: impl IntoComponent) -> Result<Self> {
        Self::builder(x).y(y).z(z).build()
    }

    /// A point from one packed operand whose leading axis is 3
    pub fn from_array(xyz: impl IntoComponent) -> Result<Self> {
        Self::builder(xyz).build()
    }

    pub fn from_vector3(v: &Vector3<f64>, unit: impl IntoUnit) -> Result<Self> {
        Self::builder(Array1::from_vec(vec![v.x, v.y, v.z]))
            .unit(unit)
            .build()
    }

    /// The position as a nalgebra vector, for a point holding exactly one position
    pub fn to_vector3(&self) -> Option<Vector3<f64>> {
        match self.components.as_slice() {
            Some(&[x, y, z]) => Some(Vector3::new(x, y, z)),
            _ => None,
        }
    }

    /// Wrap packed components after checking the leading axis
    fn packed(components: ArrayD<f64>, unit: Unit) -> Result<Self> {
        match components.shape().first() {
            None => Err(CoordinateError::InvalidInput(
                "input to CartesianPoint must be array-like, got a scalar".to_string(),
            )),
            Some(&3) => Ok(CartesianPoint { components, unit }),
            Some(&n) => Err(CoordinateError::InvalidArguments(format!(
                "input to CartesianPoint is not length 3 (got {})",
                n
            ))),
        }
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Packed components, leading axis of length 3
    pub fn xyz(&self) -> &ArrayD<f64> {
        &self.components
    }

    /// Shape of the collection of points, without the leading axis
    pub fn shape(&self) -> &[usize] {
        &self.components.shape()[1..]
    }

    fn component(&self, index: usize) -> Quantity {
        Quantity::from_array(
            self.components.index_axis(Axis(0), index).to_owned(),
            self.unit,
        )
    }

    pub fn x(&self) -> Quantity {
        self.component(0)
    }

    pub fn y(&self) -> Quantity {
        self.component(1)
    }

    pub fn z(&self) -> Quantity {
        self.component(2)
    }

    /// Euclidean length of every position, in the point's unit
    pub fn norm(&self) -> Quantity {
        let norms = self
            .components
            .map_axis(Axis(0), |v| v.iter().map(|c| c * c).sum::<f64>().sqrt());
        Quantity::from_array(norms, self.unit)
    }

    /// Convert to spherical `(distance, latitude, longitude)`
    ///
    /// The distance is in the point's unit; angles are in radians. Points
    /// without a length unit cannot produce a [`Distance`] and fail with
    /// [`UnitsError::NotLength`].
    pub fn to_spherical(&self) -> Result<(Distance, Latitude, Longitude)> {
        let x = self.components.index_axis(Axis(0), 0);
        let y = self.components.index_axis(Axis(0), 1);
        let z = self.components.index_axis(Axis(0), 2);
        let (r, lat, lon) = cartesian_to_spherical_array(&x, &y, &z)?;

        let distance = Distance::from_input(
            DistanceInput::FromValue {
                value: r,
                unit: self.unit,
            },
            Dtype::Float64,
        )?;
        let lat = Latitude::new(Angle::from_radians(lat)?)?;
        let lon = Longitude::new(Angle::from_radians(lon)?);
        Ok((distance, lat, lon))
    }

    /// Convert to another length unit
    pub fn to(&self, unit: impl IntoUnit) -> Result<CartesianPoint> {
        let unit = validate_length_unit(unit, true)?;
        let factor = self.unit.conversion_factor(&unit)?;
        Ok(CartesianPoint {
            components: self.components.mapv(|v| v * factor),
            unit,
        })
    }

    /// Apply `f` to every component value, keeping the unit
    pub fn mapv(&self, f: impl Fn(f64) -> f64) -> CartesianPoint {
        CartesianPoint {
            components: self.components.mapv(f),
            unit: self.unit,
        }
    }

    /// Run a quantity-level operation on the packed components
    ///
    /// The result is converted back to this point's unit and must still have
    /// a leading axis of length 3.
    pub fn apply(&self, f: impl FnOnce(Quantity) -> Result<Quantity>) -> Result<CartesianPoint> {
        let result = f(Quantity::from_array(self.components.clone(), self.unit))?;
        if result.unit() != self.unit {
            log::debug!(
                "Converting {} result of CartesianPoint operation back to {}",
                result.unit(),
                self.unit
            );
        }
        Self::packed(result.to_value(self.unit)?, self.unit)
    }

    fn combine(&self, other: &CartesianPoint, op: impl Fn(f64, f64) -> f64) -> Result<CartesianPoint> {
        if self.components.shape() != other.components.shape() {
            return Err(CoordinateError::InvalidArguments(format!(
                "shapes {:?} and {:?} don't match",
                self.components.shape(),
                other.components.shape()
            )));
        }
        let factor = other.unit.conversion_factor(&self.unit)?;
        let components = ndarray::Zip::from(&self.components)
            .and(&other.components)
            .map_collect(|&a, &b| op(a, b * factor));
        Ok(CartesianPoint {
            components,
            unit: self.unit,
        })
    }
}

/// Keyword-style construction of a [`CartesianPoint`]
///
/// Give either only the packed operand passed to
/// [`CartesianPoint::builder`], or that operand as `x` together with both
/// `y` and `z`.
#[derive(Debug)]
pub struct CartesianPointBuilder {
    xorarr: Result<Component>,
    y: Option<Result<Component>>,
    z: Option<Result<Component>>,
    unit: Option<std::result::Result<Unit, UnitsError>>,
    dtype: Dtype,
}

impl CartesianPointBuilder {
    pub fn y(mut self, y: impl IntoComponent) -> Self {
        self.y = Some(y.into_component());
        self
    }

    pub fn z(mut self, z: impl IntoComponent) -> Self {
        self.z = Some(z.into_component());
        self
    }

    pub fn unit(mut self, unit: impl IntoUnit) -> Self {
        self.unit = Some(unit.into_unit());
        self
    }

    pub fn dtype(mut self, dtype: Dtype) -> Self {
        self.dtype = dtype;
        self
    }

    pub fn build(self) -> Result<CartesianPoint> {
        let first = self.xorarr?;
        let unit = self.unit.transpose()?;

        let (components, unit) = match (self.y, self.z) {
            (None, None) => {
                let unit = unit.or_else(|| first.unit()).unwrap_or(DIMENSIONLESS);
                (first.into_values(Some(unit))?, unit)
            }
            (Some(y), Some(z)) => assemble([first, y?, z?], unit)?,
            _ => {
                return Err(CoordinateError::InvalidInput(
                    "x, y, and z are required to instantiate CartesianPoint".to_string(),
                ))
            }
        };

        let unit = validate_length_unit(unit, true)?;
        CartesianPoint::packed(self.dtype.apply(components), unit)
    }
}

/// Stack three separate components into one packed array and pick the unit
fn assemble(parts: [Component; 3], unit: Option<Unit>) -> Result<(ArrayD<f64>, Unit)> {
    let unit = match unit {
        Some(unit) => unit,
        None => {
            let mut units = parts.iter().filter_map(Component::unit);
            let first = units.next();
            if let Some(first) = first {
                if let Some(other) = units.find(|u| *u != first) {
                    return Err(UnitsError::Mismatch(first, other).into());
                }
            }
            first.unwrap_or(DIMENSIONLESS)
        }
    };

    let [x, y, z] = parts;
    let (x, y, z) = (
        x.into_values(Some(unit))?,
        y.into_values(Some(unit))?,
        z.into_values(Some(unit))?,
    );
    if x.shape() != y.shape() || y.shape() != z.shape() {
        return Err(CoordinateError::InvalidArguments(format!(
            "x, y, and z must have identical shapes, got {:?}, {:?} and {:?}",
            x.shape(),
            y.shape(),
            z.shape()
        )));
    }

    let stacked = ndarray::stack(Axis(0), &[x.view(), y.view(), z.view()])
        .map_err(|e| CoordinateError::InvalidInput(e.to_string()))?;
    Ok((stacked, unit))
}

impl Add for &CartesianPoint {
    type Output = Result<CartesianPoint>;

    fn add(self, other: &CartesianPoint) -> Result<CartesianPoint> {
        self.combine(other, |a, b| a + b)
    }
}

impl Sub for &CartesianPoint {
    type Output = Result<CartesianPoint>;

    fn sub(self, other: &CartesianPoint) -> Result<CartesianPoint> {
        self.combine(other, |a, b| a - b)
    }
}

impl Mul<f64> for CartesianPoint {
    type Output = CartesianPoint;

    fn mul(self, scalar: f64) -> CartesianPoint {
        CartesianPoint {
            components: self.components.mapv_into(|v| v * scalar),
            unit: self.unit,
        }
    }
}

impl Div<f64> for CartesianPoint {
    type Output = CartesianPoint;

    fn div(self, scalar: f64) -> CartesianPoint {
        CartesianPoint {
            components: self.components.mapv_into(|v| v / scalar),
            unit: self.unit,
        }
    }
}

impl Neg for CartesianPoint {
    type Output = CartesianPoint;

    fn neg(self) -> CartesianPoint {
        CartesianPoint {
            components: self.components.mapv_into(|v| -v),
            unit: self.unit,
        }
    }
}

impl fmt::Display for CartesianPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_dimensionless() {
            write!(f, "{}", self.components)
        } else {
            write!(f, "{} {}", self.components, self.unit)
        }
    }
}
