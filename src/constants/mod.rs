//! Constants module for distance and coordinate calculations

use std::f64::consts::PI;

// Astronomical distances
/// Astronomical Unit in meters (per IAU 2012 Resolution B2)
pub const AU_M: f64 = 149_597_870_700.0;
/// Parsec in meters, defined as 648000/π AU (IAU 2015 Resolution B2)
pub const PARSEC_M: f64 = AU_M * 648_000.0 / PI;
/// Julian year in seconds
pub const JULIAN_YEAR_S: f64 = 365.25 * DAY_S;
/// Light-year in meters (distance light travels in one Julian year)
pub const LIGHT_YEAR_M: f64 = C * JULIAN_YEAR_S;

// Time constants
/// Seconds in a day
pub const DAY_S: f64 = 86_400.0;

// Angles
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Tau (2*PI) for full circle
pub const TAU: f64 = 2.0 * PI;

// Physics
/// Speed of light in m/s
pub const C: f64 = 299_792_458.0;
/// Speed of light in km/s, the numerator of the Hubble distance c/H0
pub const C_KMS: f64 = C / 1000.0;

// Distance modulus
/// Raw parsec value above which an auto-selected unit becomes megaparsecs
pub const MPC_THRESHOLD_PC: f64 = 1e6;
/// Raw parsec value above which an auto-selected unit becomes kiloparsecs
pub const KPC_THRESHOLD_PC: f64 = 1e3;
