//! # Cartesian ↔ Spherical Transforms
//!
//! Low-level conversions between rectangular `(x, y, z)` coordinates and
//! spherical `(r, lat, lon)` coordinates.
//!
//! ## Angle Convention
//!
//! Angles use the latitude/longitude (elevation/azimuth) convention: latitude
//! is measured from the equatorial x-y plane, not from the pole.
//! - **lat**: `atan2(z, sqrt(x² + y²))`, in `[-π/2, π/2]`
//! - **lon**: `atan2(y, x)`, in `(-π, π]`
//!
//! ## Scalar and Array Entry Points
//!
//! [`cartesian_to_spherical`] and [`spherical_to_cartesian`] take plain `f64`
//! values. The `_array` variants take ndarray arrays of any dimensionality and
//! apply the same per-element kernel, so an array element and the equivalent
//! scalar call produce bit-identical results.
//!
//! ```rust
//! use astrodist::coordinates::transforms::{cartesian_to_spherical, spherical_to_cartesian};
//!
//! let (r, lat, lon) = cartesian_to_spherical(0.0, 3.0, 4.0);
//! assert_eq!(r, 5.0);
//! assert!((lon - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
//!
//! let (x, y, z) = spherical_to_cartesian(r, lat, lon);
//! assert!(x.abs() < 1e-15 && (y - 3.0).abs() < 1e-15 && (z - 4.0).abs() < 1e-15);
//! ```

use crate::errors::{CoordinateError, Result};
use ndarray::{Array, ArrayBase, Data, Dimension, Zip};

/// Per-element cartesian to spherical kernel shared by both entry points
#[inline]
fn to_spherical(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let xsq = x * x;
    let ysq = y * y;
    let zsq = z * z;

    let r = (xsq + ysq + zsq).sqrt();
    let s = (xsq + ysq).sqrt();

    (r, z.atan2(s), y.atan2(x))
}

/// Per-element spherical to cartesian kernel shared by both entry points
#[inline]
fn to_cartesian(r: f64, lat: f64, lon: f64) -> (f64, f64, f64) {
    let cos_lat = lat.cos();
    (r * cos_lat * lon.cos(), r * cos_lat * lon.sin(), r * lat.sin())
}

/// Converts 3D rectangular cartesian coordinates to spherical coordinates
///
/// # Returns
///
/// `(r, lat, lon)` where `r` is in the same units as the inputs and the
/// angles are in radians.
pub fn cartesian_to_spherical(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    to_spherical(x, y, z)
}

/// Converts spherical coordinates (angles in radians) to rectangular cartesian
/// coordinates
///
/// # Mathematical Conversion
///
/// - `x = r * cos(lat) * cos(lon)`
/// - `y = r * cos(lat) * sin(lon)`
/// - `z = r * sin(lat)`
pub fn spherical_to_cartesian(r: f64, lat: f64, lon: f64) -> (f64, f64, f64) {
    to_cartesian(r, lat, lon)
}

fn check_shapes(a: &[usize], b: &[usize], c: &[usize]) -> Result<()> {
    if a == b && b == c {
        Ok(())
    } else {
        Err(CoordinateError::InvalidArguments(format!(
            "shapes {:?}, {:?} and {:?} don't match",
            a, b, c
        )))
    }
}

type Triple<D> = (Array<f64, D>, Array<f64, D>, Array<f64, D>);

/// Elementwise [`cartesian_to_spherical`] over arrays of identical shape
pub fn cartesian_to_spherical_array<S, D>(
    x: &ArrayBase<S, D>,
    y: &ArrayBase<S, D>,
    z: &ArrayBase<S, D>,
) -> Result<Triple<D>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    check_shapes(x.shape(), y.shape(), z.shape())?;
    let mut r = Array::zeros(x.raw_dim());
    let mut lat = Array::zeros(x.raw_dim());
    let mut lon = Array::zeros(x.raw_dim());
    Zip::from(&mut r)
        .and(&mut lat)
        .and(&mut lon)
        .and(x)
        .and(y)
        .and(z)
        .for_each(|r, lat, lon, &x, &y, &z| {
            (*r, *lat, *lon) = to_spherical(x, y, z);
        });
    Ok((r, lat, lon))
}

/// Elementwise [`spherical_to_cartesian`] over arrays of identical shape
pub fn spherical_to_cartesian_array<S, D>(
    r: &ArrayBase<S, D>,
    lat: &ArrayBase<S, D>,
    lon: &ArrayBase<S, D>,
) -> Result<Triple<D>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    check_shapes(r.shape(), lat.shape(), lon.shape())?;
    let mut x = Array::zeros(r.raw_dim());
    let mut y = Array::zeros(r.raw_dim());
    let mut z = Array::zeros(r.raw_dim());
    Zip::from(&mut x)
        .and(&mut y)
        .and(&mut z)
        .and(r)
        .and(lat)
        .and(lon)
        .for_each(|x, y, z, &r, &lat, &lon| {
            (*x, *y, *z) = to_cartesian(r, lat, lon);
        });
    Ok((x, y, z))
}
