//! Numeric input validation
//!
//! Distances and cartesian points only hold integer or floating-point data.
//! Inputs are accepted generically over [`Element`]; element types that are
//! representable in an array but are not real numbers (booleans, complex
//! numbers) are rejected at construction time with
//! [`CoordinateError::UnsupportedDtype`].
//!
//! Everything is stored as `f64` once validated. The [`Dtype`] hint selects
//! the precision the stored values carry.

use crate::errors::{CoordinateError, Result};
use ndarray::{Array, ArrayD, Dimension, IxDyn};
use num::complex::Complex;
use num_traits::ToPrimitive;
use std::fmt;

/// Kind of the elements in an input array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Int,
    UInt,
    Float,
    Bool,
    Complex,
}

impl ElementKind {
    /// Whether elements of this kind may back a distance or coordinate
    pub fn is_real_numeric(self) -> bool {
        matches!(self, ElementKind::Int | ElementKind::UInt | ElementKind::Float)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Int => "int",
            ElementKind::UInt => "uint",
            ElementKind::Float => "float",
            ElementKind::Bool => "bool",
            ElementKind::Complex => "complex",
        };
        write!(f, "{}", name)
    }
}

/// An array element type that can be offered as distance or coordinate data
pub trait Element: Copy {
    const KIND: ElementKind;

    /// The value as `f64`, or `None` for kinds that are not real numbers
    fn to_real(self) -> Option<f64>;
}

macro_rules! real_element {
    ($kind:expr => $($t:ty),*) => {
        $(
            impl Element for $t {
                const KIND: ElementKind = $kind;

                fn to_real(self) -> Option<f64> {
                    self.to_f64()
                }
            }
        )*
    };
}

real_element!(ElementKind::Int => i8, i16, i32, i64, isize);
real_element!(ElementKind::UInt => u8, u16, u32, u64, usize);
real_element!(ElementKind::Float => f32, f64);

impl Element for bool {
    const KIND: ElementKind = ElementKind::Bool;

    fn to_real(self) -> Option<f64> {
        None
    }
}

impl<T: Copy> Element for Complex<T> {
    const KIND: ElementKind = ElementKind::Complex;

    fn to_real(self) -> Option<f64> {
        None
    }
}

/// Precision hint for the stored values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dtype {
    /// Round every value through single precision
    Float32,
    #[default]
    Float64,
}

impl Dtype {
    /// Apply this precision to an array of validated values
    pub fn apply(self, values: ArrayD<f64>) -> ArrayD<f64> {
        match self {
            Dtype::Float32 => values.mapv_into(|v| v as f32 as f64),
            Dtype::Float64 => values,
        }
    }
}

/// Validate the element kind of `input` and convert it to an `f64` array
pub fn numeric_array<T, D>(input: Array<T, D>) -> Result<ArrayD<f64>>
where
    T: Element,
    D: Dimension,
{
    if !T::KIND.is_real_numeric() {
        return Err(CoordinateError::UnsupportedDtype(T::KIND));
    }
    let shape = input.shape().to_vec();
    let values = input
        .iter()
        .map(|&v| v.to_real().ok_or(CoordinateError::UnsupportedDtype(T::KIND)))
        .collect::<Result<Vec<f64>>>()?;
    Array::from_shape_vec(IxDyn(&shape), values)
        .map_err(|e| CoordinateError::InvalidInput(e.to_string()))
}

/// Build a 0-d array holding one validated value
pub fn numeric_scalar<T: Element>(value: T) -> Result<ArrayD<f64>> {
    numeric_array(ndarray::arr0(value))
}

/// Build a 1-d array from a slice of validated values
pub fn numeric_vec<T: Element>(values: &[T]) -> Result<ArrayD<f64>> {
    numeric_array(Array::from_vec(values.to_vec()))
}

/// Build a 2-d array from nested rows, rejecting ragged input
pub fn nested_array<T: Element>(rows: &[Vec<T>]) -> Result<ArrayD<f64>> {
    let ncols = rows.first().map_or(0, Vec::len);
    if let Some(bad) = rows.iter().position(|row| row.len() != ncols) {
        return Err(CoordinateError::InvalidInput(format!(
            "setting an array element with a sequence: row {} has length {}, expected {}",
            bad,
            rows[bad].len(),
            ncols
        )));
    }
    let flat: Vec<T> = rows.iter().flatten().copied().collect();
    let grid = Array::from_shape_vec((rows.len(), ncols), flat)
        .map_err(|e| CoordinateError::InvalidInput(e.to_string()))?;
    numeric_array(grid)
}

/// Anything that can be turned into a validated `f64` array: scalars,
/// vectors, slices and ndarray arrays of any [`Element`] type
pub trait IntoNumeric {
    fn into_numeric(self) -> Result<ArrayD<f64>>;
}

impl<T: Element, D: Dimension> IntoNumeric for Array<T, D> {
    fn into_numeric(self) -> Result<ArrayD<f64>> {
        numeric_array(self)
    }
}

impl<T: Element> IntoNumeric for Vec<T> {
    fn into_numeric(self) -> Result<ArrayD<f64>> {
        numeric_array(Array::from_vec(self))
    }
}

impl<T: Element> IntoNumeric for &[T] {
    fn into_numeric(self) -> Result<ArrayD<f64>> {
        numeric_vec(self)
    }
}

impl<T: Element, const N: usize> IntoNumeric for [T; N] {
    fn into_numeric(self) -> Result<ArrayD<f64>> {
        numeric_vec(&self)
    }
}

macro_rules! scalar_into_numeric {
    ($($t:ty),*) => {
        $(
            impl IntoNumeric for $t {
                fn into_numeric(self) -> Result<ArrayD<f64>> {
                    numeric_scalar(self)
                }
            }
        )*
    };
}

scalar_into_numeric!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool);

impl<T: Copy> IntoNumeric for Complex<T> {
    fn into_numeric(self) -> Result<ArrayD<f64>> {
        numeric_scalar(self)
    }
}
