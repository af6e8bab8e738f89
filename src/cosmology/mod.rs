//! Cosmological distance model
//!
//! Distances built from a redshift need a cosmology to map `z` onto a
//! luminosity distance. This module provides the [`Cosmology`] trait, a flat
//! matter + Λ model with the common WMAP/Planck parameter sets, and the
//! process-wide default used when a caller does not pass one explicitly.
//!
//! The default is only a convenience: every API that falls back on it also
//! accepts an explicit `&dyn Cosmology`, and tests can swap it with
//! [`set_default_cosmology`].

use crate::constants::C_KMS;
use crate::errors::{CoordinateError, Result};
use crate::units::{Quantity, MEGAPARSEC};
use lazy_static::lazy_static;
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// A cosmological model able to compute luminosity distances
pub trait Cosmology: Send + Sync + std::fmt::Debug {
    /// Short identifying name, e.g. "WMAP7"
    fn name(&self) -> &str;

    /// Luminosity distance in megaparsecs for a single redshift
    fn luminosity_distance_mpc(&self, z: f64) -> f64;

    /// Luminosity distance for every redshift in `z`
    fn luminosity_distance(&self, z: &ArrayD<f64>) -> Quantity {
        Quantity::from_array(z.mapv(|zi| self.luminosity_distance_mpc(zi)), MEGAPARSEC)
    }
}

/// Parameters of a spatially flat universe with matter and a cosmological constant
///
/// Radiation is neglected and dark energy is a pure cosmological constant,
/// so `Ωλ = 1 - Ωm`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatLambdaCdm {
    /// Model name
    pub name: String,
    /// Hubble constant at z = 0 in km/s/Mpc
    #[serde(rename = "H0")]
    pub h0: f64,
    /// Matter density parameter at z = 0
    #[serde(rename = "Om0")]
    pub om0: f64,
}

/// Relative accuracy of the comoving distance integral
const INTEGRATION_TOLERANCE: f64 = 1e-10;
/// Recursion limit of the adaptive Simpson integrator
const INTEGRATION_MAX_DEPTH: u32 = 50;

impl FlatLambdaCdm {
    /// Create a model after checking its parameters are physical
    pub fn new(name: &str, h0: f64, om0: f64) -> Result<Self> {
        let model = FlatLambdaCdm {
            name: name.to_string(),
            h0,
            om0,
        };
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        if !(self.h0.is_finite() && self.h0 > 0.0) {
            return Err(CoordinateError::InvalidArguments(format!(
                "H0 must be positive, got {}",
                self.h0
            )));
        }
        if !(0.0..=1.0).contains(&self.om0) {
            return Err(CoordinateError::InvalidArguments(format!(
                "Om0 must lie in [0, 1] for a flat universe, got {}",
                self.om0
            )));
        }
        Ok(())
    }

    /// Load model parameters from a JSON document like
    /// `{"name": "custom", "H0": 70.0, "Om0": 0.3}`
    pub fn from_json(json: &str) -> Result<Self> {
        let model: FlatLambdaCdm = serde_json::from_str(json)
            .map_err(|e| CoordinateError::InvalidInput(format!("cosmology config: {}", e)))?;
        model.validate()?;
        Ok(model)
    }

    /// WMAP 5-year parameters (Komatsu et al. 2009)
    pub fn wmap5() -> Self {
        Self::preset_unchecked("WMAP5", 70.2, 0.277)
    }

    /// WMAP 7-year parameters (Komatsu et al. 2011)
    pub fn wmap7() -> Self {
        Self::preset_unchecked("WMAP7", 70.4, 0.272)
    }

    /// WMAP 9-year parameters (Hinshaw et al. 2013)
    pub fn wmap9() -> Self {
        Self::preset_unchecked("WMAP9", 69.32, 0.2865)
    }

    /// Planck 2013 parameters (Planck Collaboration 2014)
    pub fn planck13() -> Self {
        Self::preset_unchecked("Planck13", 67.77, 0.30712)
    }

    fn preset_unchecked(name: &str, h0: f64, om0: f64) -> Self {
        FlatLambdaCdm {
            name: name.to_string(),
            h0,
            om0,
        }
    }

    /// Look up a built-in parameter set by name (case-insensitive)
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "wmap5" => Some(Self::wmap5()),
            "wmap7" => Some(Self::wmap7()),
            "wmap9" => Some(Self::wmap9()),
            "planck13" => Some(Self::planck13()),
            _ => None,
        }
    }

    /// Hubble distance c/H0 in megaparsecs
    pub fn hubble_distance_mpc(&self) -> f64 {
        C_KMS / self.h0
    }

    /// Dimensionless Hubble parameter E(z) = H(z)/H0
    pub fn efunc(&self, z: f64) -> f64 {
        let zp1 = 1.0 + z;
        (self.om0 * zp1 * zp1 * zp1 + (1.0 - self.om0)).sqrt()
    }

    /// Line-of-sight comoving distance in megaparsecs
    pub fn comoving_distance_mpc(&self, z: f64) -> f64 {
        let integral = adaptive_simpson(|zp| 1.0 / self.efunc(zp), 0.0, z);
        self.hubble_distance_mpc() * integral
    }
}

impl Cosmology for FlatLambdaCdm {
    fn name(&self) -> &str {
        &self.name
    }

    /// NaN for `z <= -1`, where the scale factor `1/(1+z)` is not positive
    fn luminosity_distance_mpc(&self, z: f64) -> f64 {
        if z.is_nan() || z <= -1.0 {
            return f64::NAN;
        }
        (1.0 + z) * self.comoving_distance_mpc(z)
    }
}

/// Integrate `f` over `[a, b]` with adaptive Simpson quadrature
///
/// A non-finite integrand anywhere the rule samples makes the result NaN.
fn adaptive_simpson(f: impl Fn(f64) -> f64, a: f64, b: f64) -> f64 {
    if a == b {
        return 0.0;
    }
    let fa = f(a);
    let fb = f(b);
    let m = 0.5 * (a + b);
    let fm = f(m);
    let whole = (b - a) / 6.0 * (fa + 4.0 * fm + fb);
    simpson_step(&f, a, b, fa, fm, fb, whole, INTEGRATION_TOLERANCE, INTEGRATION_MAX_DEPTH)
}

#[allow(clippy::too_many_arguments)]
fn simpson_step(
    f: &impl Fn(f64) -> f64,
    a: f64,
    b: f64,
    fa: f64,
    fm: f64,
    fb: f64,
    whole: f64,
    tol: f64,
    depth: u32,
) -> f64 {
    let m = 0.5 * (a + b);
    let lm = 0.5 * (a + m);
    let rm = 0.5 * (m + b);
    let flm = f(lm);
    let frm = f(rm);
    let left = (m - a) / 6.0 * (fa + 4.0 * flm + fm);
    let right = (b - m) / 6.0 * (fm + 4.0 * frm + fb);
    let delta = left + right - whole;
    if !delta.is_finite() {
        return f64::NAN;
    }
    if depth == 0 || delta.abs() <= 15.0 * tol * (left + right).abs().max(f64::MIN_POSITIVE) {
        return left + right + delta / 15.0;
    }
    simpson_step(f, a, m, fa, flm, fm, left, tol, depth - 1)
        + simpson_step(f, m, b, fm, frm, fb, right, tol, depth - 1)
}

lazy_static! {
    static ref DEFAULT_COSMOLOGY: RwLock<Arc<dyn Cosmology>> =
        RwLock::new(Arc::new(FlatLambdaCdm::wmap7()) as Arc<dyn Cosmology>);
}

/// The cosmology used when none is passed explicitly (WMAP7 unless replaced)
pub fn default_cosmology() -> Arc<dyn Cosmology> {
    match DEFAULT_COSMOLOGY.read() {
        Ok(guard) => Arc::clone(&*guard),
        Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
    }
}

/// Replace the process-wide default cosmology, returning the previous one
pub fn set_default_cosmology(cosmology: Arc<dyn Cosmology>) -> Arc<dyn Cosmology> {
    log::info!("Setting default cosmology to {}", cosmology.name());
    let mut guard = match DEFAULT_COSMOLOGY.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    std::mem::replace(&mut *guard, cosmology)
}

/// Restore WMAP7 as the default cosmology
pub fn reset_default_cosmology() -> Arc<dyn Cosmology> {
    set_default_cosmology(Arc::new(FlatLambdaCdm::wmap7()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_low_redshift_hubble_law() {
        // D_L ≈ cz/H0 for z << 1
        let cosmo = FlatLambdaCdm::wmap7();
        let z = 1e-4;
        let expected = C_KMS * z / cosmo.h0;
        assert_relative_eq!(cosmo.luminosity_distance_mpc(z), expected, max_relative = 1e-3);
    }

    #[test]
    fn test_einstein_de_sitter_closed_form() {
        // Om0 = 1: D_C = 2 c/H0 (1 - 1/sqrt(1+z))
        let cosmo = FlatLambdaCdm::new("EdS", 70.0, 1.0).unwrap();
        for &z in &[0.1, 0.5, 1.0, 3.0] {
            let expected = 2.0 * cosmo.hubble_distance_mpc() * (1.0 - 1.0 / (1.0f64 + z).sqrt());
            assert_relative_eq!(cosmo.comoving_distance_mpc(z), expected, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_de_sitter_closed_form() {
        // Om0 = 0: D_C = c/H0 z
        let cosmo = FlatLambdaCdm::new("dS", 70.0, 0.0).unwrap();
        assert_relative_eq!(
            cosmo.comoving_distance_mpc(2.0),
            2.0 * cosmo.hubble_distance_mpc(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_zero_redshift() {
        assert_eq!(FlatLambdaCdm::planck13().luminosity_distance_mpc(0.0), 0.0);
    }

    #[test]
    fn test_unphysical_redshift_is_nan() {
        let cosmo = FlatLambdaCdm::wmap7();
        // E(z) is NaN below z ≈ -2.39 for these parameters
        assert!(cosmo.efunc(-2.5).is_nan());
        assert!(cosmo.comoving_distance_mpc(-2.5).is_nan());
        for &z in &[-1.0, -1.4, -2.5, -1e6, f64::NAN] {
            assert!(cosmo.luminosity_distance_mpc(z).is_nan(), "z = {}", z);
        }
        assert!(cosmo.luminosity_distance_mpc(-0.5) < 0.0);
    }

    #[test]
    fn test_simpson_stops_on_non_finite_integrand() {
        assert!(adaptive_simpson(|x| (x - 1.0).sqrt(), 0.0, 2.0).is_nan());
        assert!(adaptive_simpson(|x| 1.0 / x, 0.0, 1.0).is_nan());
        assert_relative_eq!(adaptive_simpson(|x| x * x, 0.0, 3.0), 9.0, max_relative = 1e-12);
    }

    #[test]
    fn test_array_luminosity_distance() {
        let cosmo = FlatLambdaCdm::wmap5();
        let ld = cosmo.luminosity_distance(&array![0.1, 0.5].into_dyn());
        assert_eq!(ld.unit(), MEGAPARSEC);
        assert_eq!(ld.shape(), &[2]);
        let values = ld.value().as_slice().unwrap();
        assert_eq!(values[0], cosmo.luminosity_distance_mpc(0.1));
        assert!(values[1] > values[0]);
    }

    #[test]
    fn test_presets_by_name() {
        assert_eq!(FlatLambdaCdm::preset("wmap7"), Some(FlatLambdaCdm::wmap7()));
        assert_eq!(FlatLambdaCdm::preset("Planck13").unwrap().h0, 67.77);
        assert!(FlatLambdaCdm::preset("Planck99").is_none());
    }

    #[test]
    fn test_from_json() {
        let cosmo = FlatLambdaCdm::from_json(r#"{"name": "custom", "H0": 68.0, "Om0": 0.31}"#)
            .unwrap();
        assert_eq!(cosmo.name(), "custom");
        assert_eq!(cosmo.h0, 68.0);

        let err = FlatLambdaCdm::from_json(r#"{"name": "bad", "H0": -1.0, "Om0": 0.3}"#);
        assert!(matches!(err, Err(CoordinateError::InvalidArguments(_))));

        let err = FlatLambdaCdm::from_json("{not json");
        assert!(matches!(err, Err(CoordinateError::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(FlatLambdaCdm::new("x", 0.0, 0.3).is_err());
        assert!(FlatLambdaCdm::new("x", 70.0, 1.5).is_err());
    }
}
