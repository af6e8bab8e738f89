//! Astrodist: unit-validated astronomical distances and cartesian coordinates
//!
//! This crate provides length-typed [`Distance`] values that can be built from
//! a value and unit, a redshift, or a distance modulus, and [`CartesianPoint`]
//! positions that convert to spherical coordinates.
//!
//! ```rust
//! use astrodist::{CartesianPoint, Distance};
//! use astrodist::units::KILOPARSEC;
//!
//! let p = CartesianPoint::new(3.0, 4.0, 0.0, KILOPARSEC).unwrap();
//! let (r, _lat, _lon) = p.to_spherical().unwrap();
//! assert_eq!(r, Distance::scalar(5.0, KILOPARSEC).unwrap());
//! ```

pub mod constants;
pub mod coordinates;
pub mod cosmology;
pub mod errors;
pub mod numeric;
pub mod optimize;
pub mod units;

// Re-export commonly used types
pub use coordinates::{CartesianPoint, Distance, Latitude, Longitude};
pub use cosmology::{Cosmology, FlatLambdaCdm};
pub use errors::{CoordinateError, Result};
pub use units::{Quantity, Unit, UnitsError};
