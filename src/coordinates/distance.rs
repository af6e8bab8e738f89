//! # Distances
//!
//! A [`Distance`] is a scalar or array of lengths. It can be created four ways:
//!
//! - a value and a length unit
//! - an existing [`Quantity`], optionally converted to another unit
//! - a redshift, via the luminosity distance of a [`Cosmology`]
//! - a distance modulus
//!
//! Each source is one variant of [`DistanceInput`]. [`DistanceBuilder`]
//! accepts the sources as independent optional arguments, rejects conflicting
//! combinations, and hands the resulting variant to [`Distance::from_input`],
//! which is the only place a distance is validated and constructed.
//!
//! ```rust
//! use astrodist::coordinates::Distance;
//! use astrodist::units::{KILOPARSEC, MEGAPARSEC};
//!
//! let d = Distance::scalar(10.0, MEGAPARSEC).unwrap();
//! assert!((d.kpc().sum() - 1e4).abs() < 1e-8);
//!
//! // 10^((24.47 + 5) / 5) ≈ 7.8e5 pc, shown in kiloparsecs
//! let d = Distance::from_distmod(24.47).unwrap();
//! assert_eq!(d.unit(), KILOPARSEC);
//! assert!((d.distmod().as_scalar().unwrap() - 24.47).abs() < 1e-10);
//!
//! let d = Distance::builder().value(vec![1, 2, 3]).unit(KILOPARSEC).build().unwrap();
//! assert_eq!(d.value().shape(), &[3]);
//! ```

use super::validate_length_unit;
use crate::constants::{KPC_THRESHOLD_PC, MPC_THRESHOLD_PC};
use crate::cosmology::{default_cosmology, Cosmology};
use crate::errors::{CoordinateError, Result};
use crate::numeric::{Dtype, IntoNumeric};
use crate::optimize;
use crate::units::{
    IntoUnit, Quantity, Unit, UnitsError, KILOMETER, KILOPARSEC, LIGHT_YEAR, MAGNITUDE,
    MEGAPARSEC, PARSEC,
};
use ndarray::ArrayD;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

/// The data source a distance is built from
#[derive(Debug, Clone)]
pub enum DistanceInput {
    /// Raw numbers in a given unit
    FromValue { value: ArrayD<f64>, unit: Unit },
    /// An existing quantity, converted to `unit` when one is given
    FromQuantity {
        quantity: Quantity,
        unit: Option<Unit>,
    },
    /// Luminosity distance at redshift `z`; `None` uses the default cosmology
    FromRedshift {
        z: ArrayD<f64>,
        cosmology: Option<Arc<dyn Cosmology>>,
        unit: Option<Unit>,
    },
    /// Distance modulus in magnitudes; with no unit, one of pc/kpc/Mpc is
    /// picked from the size of the result
    FromDistanceModulus {
        distmod: ArrayD<f64>,
        unit: Option<Unit>,
    },
}

/// A length-typed scalar or array
///
/// The unit is always a length; every constructor and every arithmetic
/// operation preserves that.
#[derive(Debug, Clone, PartialEq)]
pub struct Distance {
    quantity: Quantity,
}

impl Distance {
    /// Build a distance from one data source
    pub fn from_input(input: DistanceInput, dtype: Dtype) -> Result<Self> {
        let (value, unit) = match input {
            DistanceInput::FromValue { value, unit } => (value, unit),
            DistanceInput::FromQuantity {
                quantity,
                unit: Some(unit),
            } => (quantity.to_value(unit)?, unit),
            DistanceInput::FromQuantity {
                quantity,
                unit: None,
            } => quantity.into_parts(),
            DistanceInput::FromRedshift { z, cosmology, unit } => {
                let cosmology = cosmology.unwrap_or_else(default_cosmology);
                let mut ld = cosmology.luminosity_distance(&z);
                if let Some(unit) = unit {
                    ld = ld.to(unit)?;
                }
                ld.into_parts()
            }
            DistanceInput::FromDistanceModulus { distmod, unit } => {
                let pc = distmod.mapv(distmod_to_pc);
                match unit {
                    Some(unit) => (Quantity::from_array(pc, PARSEC).to_value(unit)?, unit),
                    None => auto_scale_parsecs(pc),
                }
            }
        };

        let unit = validate_length_unit(unit, false)?;
        Ok(Distance {
            quantity: Quantity::from_array(dtype.apply(value), unit),
        })
    }

    /// Start a builder taking the sources as optional keyword-style arguments
    pub fn builder() -> DistanceBuilder {
        DistanceBuilder::default()
    }

    /// A distance from raw values and a length unit
    pub fn new(value: impl IntoNumeric, unit: impl IntoUnit) -> Result<Self> {
        Self::builder().value(value).unit(unit).build()
    }

    /// A zero-dimensional distance
    pub fn scalar(value: f64, unit: Unit) -> Result<Self> {
        Self::new(value, unit)
    }

    /// A distance from a quantity, keeping its unit
    pub fn from_quantity(quantity: Quantity) -> Result<Self> {
        Self::from_input(
            DistanceInput::FromQuantity {
                quantity,
                unit: None,
            },
            Dtype::default(),
        )
    }

    /// The luminosity distance at redshift `z`, in megaparsecs
    ///
    /// Uses the default cosmology when `cosmology` is `None`.
    pub fn from_redshift(z: f64, cosmology: Option<Arc<dyn Cosmology>>) -> Result<Self> {
        let mut builder = Self::builder().z(z);
        if let Some(cosmology) = cosmology {
            builder = builder.cosmology(cosmology);
        }
        builder.build()
    }

    /// The distance for a distance modulus, in the most readable of pc, kpc or Mpc
    pub fn from_distmod(distmod: f64) -> Result<Self> {
        Self::builder().distmod(distmod).build()
    }

    pub fn value(&self) -> &ArrayD<f64> {
        self.quantity.value()
    }

    pub fn unit(&self) -> Unit {
        self.quantity.unit()
    }

    /// The single value of a one-element distance
    pub fn as_scalar(&self) -> Option<f64> {
        self.quantity.as_scalar()
    }

    pub fn as_quantity(&self) -> &Quantity {
        &self.quantity
    }

    pub fn into_quantity(self) -> Quantity {
        self.quantity
    }

    /// Convert to another length unit
    pub fn to(&self, unit: impl IntoUnit) -> Result<Distance> {
        let unit = validate_length_unit(unit, false)?;
        Ok(Distance {
            quantity: self.quantity.to(unit)?,
        })
    }

    /// Values in `unit`; both are lengths, so only the scale differs
    fn value_in(&self, unit: Unit) -> ArrayD<f64> {
        self.quantity.equivalent_value(unit)
    }

    /// Values in parsecs
    pub fn pc(&self) -> ArrayD<f64> {
        self.value_in(PARSEC)
    }

    /// Values in kiloparsecs
    pub fn kpc(&self) -> ArrayD<f64> {
        self.value_in(KILOPARSEC)
    }

    /// Values in megaparsecs
    pub fn mpc(&self) -> ArrayD<f64> {
        self.value_in(MEGAPARSEC)
    }

    /// Values in light-years
    pub fn lyr(&self) -> ArrayD<f64> {
        self.value_in(LIGHT_YEAR)
    }

    /// Values in kilometers
    pub fn km(&self) -> ArrayD<f64> {
        self.value_in(KILOMETER)
    }

    /// The distance modulus `5 log10(d / 10 pc)` in magnitudes
    pub fn distmod(&self) -> Quantity {
        Quantity::from_array(self.pc().mapv_into(|pc| 5.0 * pc.log10() - 5.0), MAGNITUDE)
    }

    /// Short for `compute_z(None)`
    pub fn z(&self) -> Result<f64> {
        self.compute_z(None)
    }

    /// The redshift at which this distance is the luminosity distance
    ///
    /// Minimizes `(D_L(z) - d)²` with Brent's method over `u = ln z`, bracketing
    /// downhill from `u = 0` and `u = 1` without bounds. Every trial redshift
    /// is positive, where `D_L` increases monotonically, so the residual has
    /// exactly one minimum. The result is as precise as the minimizer's
    /// tolerance (relative 1.48e-8 in `u`) allows.
    ///
    /// A zero distance gives `z = 0`. Only positive scalar distances are
    /// supported; negative, NaN or array-valued distances fail with
    /// [`CoordinateError::InvalidArguments`].
    pub fn compute_z(&self, cosmology: Option<&dyn Cosmology>) -> Result<f64> {
        let d_mpc = match self.mpc().iter().copied().collect::<Vec<_>>().as_slice() {
            &[d] => d,
            values => {
                return Err(CoordinateError::InvalidArguments(format!(
                    "compute_z requires a scalar distance, got {} values",
                    values.len()
                )))
            }
        };

        if d_mpc == 0.0 {
            return Ok(0.0);
        }
        if d_mpc.is_nan() || d_mpc < 0.0 {
            return Err(CoordinateError::InvalidArguments(format!(
                "compute_z requires a positive distance, got {} Mpc",
                d_mpc
            )));
        }

        let default;
        let cosmology = match cosmology {
            Some(cosmology) => cosmology,
            None => {
                default = default_cosmology();
                default.as_ref()
            }
        };

        let min = optimize::brent(|u| {
            (cosmology.luminosity_distance_mpc(u.exp()) - d_mpc).powi(2)
        })?;
        let z = min.x.exp();
        log::debug!(
            "compute_z: {} Mpc -> z = {} ({}, {} iterations, {} evaluations, residual {:e})",
            d_mpc,
            z,
            cosmology.name(),
            min.iterations,
            min.evaluations,
            min.fx
        );
        if !min.converged {
            log::warn!(
                "compute_z did not converge for {} Mpc after {} iterations",
                d_mpc,
                min.iterations
            );
        }
        Ok(z)
    }
}

/// Parsecs for a distance modulus
fn distmod_to_pc(dm: f64) -> f64 {
    10f64.powf((dm + 5.0) / 5.0)
}

/// Express raw parsecs in Mpc above 1e6 pc, kpc above 1e3 pc, else pc
///
/// Arrays are scaled as a whole, chosen by their largest element.
fn auto_scale_parsecs(pc: ArrayD<f64>) -> (ArrayD<f64>, Unit) {
    let largest = pc.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (scaled, unit) = if largest > MPC_THRESHOLD_PC {
        (pc.mapv_into(|v| v / MPC_THRESHOLD_PC), MEGAPARSEC)
    } else if largest > KPC_THRESHOLD_PC {
        (pc.mapv_into(|v| v / KPC_THRESHOLD_PC), KILOPARSEC)
    } else {
        (pc, PARSEC)
    };
    log::debug!("Distance modulus gives up to {} pc; using {}", largest, unit);
    (scaled, unit)
}

/// Keyword-style construction of a [`Distance`]
///
/// Exactly one data source must be given: `value` (raw numbers with a
/// `unit`), `quantity`, `z` (with an optional `cosmology`), or `distmod`.
/// `unit`, when given with a quantity, redshift or distance modulus, is the
/// unit to convert the result to.
#[derive(Debug, Default)]
pub struct DistanceBuilder {
    value: Option<Result<ArrayD<f64>>>,
    quantity: Option<Quantity>,
    unit: Option<std::result::Result<Unit, UnitsError>>,
    z: Option<Result<ArrayD<f64>>>,
    cosmology: Option<Arc<dyn Cosmology>>,
    distmod: Option<Result<ArrayD<f64>>>,
    dtype: Dtype,
}

impl DistanceBuilder {
    /// Raw distance values; requires a `unit`
    pub fn value(mut self, value: impl IntoNumeric) -> Self {
        self.value = Some(value.into_numeric());
        self
    }

    /// A quantity that already carries a unit
    pub fn quantity(mut self, quantity: Quantity) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn unit(mut self, unit: impl IntoUnit) -> Self {
        self.unit = Some(unit.into_unit());
        self
    }

    pub fn z(mut self, z: impl IntoNumeric) -> Self {
        self.z = Some(z.into_numeric());
        self
    }

    pub fn cosmology(mut self, cosmology: Arc<dyn Cosmology>) -> Self {
        self.cosmology = Some(cosmology);
        self
    }

    /// Distance modulus in magnitudes
    pub fn distmod(mut self, distmod: impl IntoNumeric) -> Self {
        self.distmod = Some(distmod.into_numeric());
        self
    }

    /// Distance modulus as a quantity in magnitudes
    pub fn distmod_quantity(mut self, distmod: &Quantity) -> Self {
        self.distmod = Some(distmod.to_value(MAGNITUDE).map_err(CoordinateError::from));
        self
    }

    pub fn dtype(mut self, dtype: Dtype) -> Self {
        self.dtype = dtype;
        self
    }

    /// Resolve the arguments into a single [`DistanceInput`]
    pub fn into_input(self) -> Result<DistanceInput> {
        let value = self.value.transpose()?;
        let z = self.z.transpose()?;
        let distmod = self.distmod.transpose()?;
        let unit = self.unit.transpose()?;

        if value.is_some() && self.quantity.is_some() {
            return Err(CoordinateError::InvalidArguments(
                "both a raw `value` and a quantity were given to Distance constructor".to_string(),
            ));
        }

        if let Some(quantity) = self.quantity {
            if z.is_some() || distmod.is_some() {
                return Err(CoordinateError::InvalidArguments(
                    "`value` was given along with `z` or `distmod` in Quantity constructor"
                        .to_string(),
                ));
            }
            if self.cosmology.is_some() {
                return Err(cosmology_without_z());
            }
            return Ok(DistanceInput::FromQuantity { quantity, unit });
        }

        let Some(value) = value else {
            return match (z, distmod) {
                (Some(_), Some(_)) => Err(CoordinateError::InvalidArguments(
                    "both `z` and `distmod` given in Distance constructor".to_string(),
                )),
                (Some(z), None) => Ok(DistanceInput::FromRedshift {
                    z,
                    cosmology: self.cosmology,
                    unit,
                }),
                (None, Some(_)) if self.cosmology.is_some() => Err(cosmology_without_z()),
                (None, Some(distmod)) => Ok(DistanceInput::FromDistanceModulus { distmod, unit }),
                (None, None) => Err(CoordinateError::InvalidArguments(
                    "none of `value`, `z`, or `distmod` were given to Distance constructor"
                        .to_string(),
                )),
            };
        };

        if z.is_some() {
            return Err(CoordinateError::InvalidArguments(
                "Both `z` and a `value` were provided in Distance constructor".to_string(),
            ));
        }
        if self.cosmology.is_some() {
            return Err(cosmology_without_z());
        }
        if distmod.is_some() {
            return Err(CoordinateError::InvalidArguments(
                "Both `distmod` and a `value` were provided in Distance constructor".to_string(),
            ));
        }
        let unit = unit.ok_or(UnitsError::MissingUnit("Distance constructor"))?;
        Ok(DistanceInput::FromValue { value, unit })
    }

    pub fn build(self) -> Result<Distance> {
        let dtype = self.dtype;
        Distance::from_input(self.into_input()?, dtype)
    }
}

fn cosmology_without_z() -> CoordinateError {
    CoordinateError::InvalidArguments(
        "A `cosmology` was given but `z` was not provided in Distance constructor".to_string(),
    )
}

// Arithmetic keeps the left operand's unit, so results stay lengths

impl Add for &Distance {
    type Output = Result<Distance>;

    fn add(self, other: &Distance) -> Result<Distance> {
        Ok(Distance {
            quantity: self.quantity.try_add(&other.quantity)?,
        })
    }
}

impl Sub for &Distance {
    type Output = Result<Distance>;

    fn sub(self, other: &Distance) -> Result<Distance> {
        Ok(Distance {
            quantity: self.quantity.try_sub(&other.quantity)?,
        })
    }
}

impl Mul<f64> for Distance {
    type Output = Distance;

    fn mul(self, scalar: f64) -> Distance {
        Distance {
            quantity: self.quantity * scalar,
        }
    }
}

impl Div<f64> for Distance {
    type Output = Distance;

    fn div(self, scalar: f64) -> Distance {
        Distance {
            quantity: self.quantity / scalar,
        }
    }
}

impl Neg for Distance {
    type Output = Distance;

    fn neg(self) -> Distance {
        Distance {
            quantity: -self.quantity,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.quantity.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosmology::FlatLambdaCdm;
    use crate::units::{AU, DEGREE, DIMENSIONLESS, SECOND};
    use approx::assert_relative_eq;
    use ndarray::array;
    use rstest::rstest;

    fn scalar(a: &ArrayD<f64>) -> f64 {
        assert_eq!(a.len(), 1);
        a.iter().copied().sum()
    }

    #[test]
    fn test_value_and_unit() {
        let d = Distance::new(10.0, MEGAPARSEC).unwrap();
        assert_eq!(d.unit(), MEGAPARSEC);
        assert_eq!(d.as_scalar(), Some(10.0));
        assert_relative_eq!(scalar(&d.kpc()), 1e4, max_relative = 1e-14);
        assert_relative_eq!(scalar(&d.pc()), 1e7, max_relative = 1e-14);

        let d = Distance::new(40, "AU").unwrap();
        assert_eq!(d.unit(), AU);
        assert_eq!(d.as_scalar(), Some(40.0));
    }

    #[test]
    fn test_light_years_and_kilometers() {
        let d = Distance::scalar(1.0, PARSEC).unwrap();
        assert_relative_eq!(scalar(&d.lyr()), 3.261_563_777, max_relative = 1e-9);
        assert_relative_eq!(scalar(&d.km()), 3.085_677_581_491_367e13, max_relative = 1e-14);
    }

    #[test]
    fn test_missing_unit() {
        let err = Distance::builder().value(5.0).build().unwrap_err();
        assert_eq!(
            err,
            CoordinateError::Units(UnitsError::MissingUnit("Distance constructor"))
        );
    }

    #[rstest]
    #[case(DEGREE)]
    #[case(SECOND)]
    #[case(DIMENSIONLESS)]
    fn test_non_length_unit(#[case] unit: Unit) {
        let err = Distance::new(1.0, unit).unwrap_err();
        assert_eq!(err, CoordinateError::Units(UnitsError::NotLength(unit)));
    }

    #[test]
    fn test_from_quantity_keeps_or_converts_unit() {
        let q = Quantity::scalar(2.0, KILOPARSEC).unwrap();
        let d = Distance::from_quantity(q.clone()).unwrap();
        assert_eq!(d.unit(), KILOPARSEC);
        assert_eq!(d.as_scalar(), Some(2.0));

        let d = Distance::builder().quantity(q).unit(PARSEC).build().unwrap();
        assert_eq!(d.unit(), PARSEC);
        assert_relative_eq!(d.as_scalar().unwrap(), 2000.0, max_relative = 1e-14);
    }

    #[test]
    fn test_from_quantity_rejects_angles() {
        let q = Quantity::scalar(2.0, DEGREE).unwrap();
        assert!(matches!(
            Distance::from_quantity(q.clone()),
            Err(CoordinateError::Units(UnitsError::NotLength(_)))
        ));
        assert!(matches!(
            Distance::builder().quantity(q).unit(PARSEC).build(),
            Err(CoordinateError::Units(UnitsError::Incompatible { .. }))
        ));
    }

    #[rstest]
    #[case::quantity_and_z(Distance::builder().quantity(Quantity::scalar(1.0, PARSEC).unwrap()).z(0.1))]
    #[case::quantity_and_distmod(Distance::builder().quantity(Quantity::scalar(1.0, PARSEC).unwrap()).distmod(3.0))]
    #[case::z_and_distmod(Distance::builder().z(0.1).distmod(3.0))]
    #[case::value_and_z(Distance::builder().value(1.0).unit(PARSEC).z(0.1))]
    #[case::value_and_distmod(Distance::builder().value(1.0).unit(PARSEC).distmod(3.0))]
    #[case::cosmology_without_z(Distance::builder().value(1.0).unit(PARSEC).cosmology(Arc::new(FlatLambdaCdm::wmap5())))]
    #[case::cosmology_with_distmod(Distance::builder().distmod(3.0).cosmology(Arc::new(FlatLambdaCdm::wmap5())))]
    #[case::nothing(Distance::builder())]
    fn test_conflicting_arguments(#[case] builder: DistanceBuilder) {
        assert!(matches!(
            builder.build(),
            Err(CoordinateError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_no_arguments_message() {
        let err = Distance::builder().build().unwrap_err();
        assert!(err.to_string().contains("none of `value`, `z`, or `distmod`"));
    }

    #[test]
    fn test_bad_element_kind_surfaces_at_build() {
        let err = Distance::builder().value(vec![true, false]).unit(PARSEC).build();
        assert!(matches!(err, Err(CoordinateError::UnsupportedDtype(_))));
    }

    #[rstest]
    #[case(0.0, PARSEC, 10.0)]
    #[case(12.0, KILOPARSEC, 2.511_886_431_509_58)]
    #[case(24.47, KILOPARSEC, 783.429_642_766_212)]
    #[case(30.0, MEGAPARSEC, 10.0)]
    fn test_distmod_auto_unit(#[case] dm: f64, #[case] unit: Unit, #[case] expected: f64) {
        let d = Distance::from_distmod(dm).unwrap();
        assert_eq!(d.unit(), unit);
        assert_relative_eq!(d.as_scalar().unwrap(), expected, max_relative = 1e-12);
        assert_relative_eq!(d.distmod().as_scalar().unwrap(), dm, epsilon = 1e-12);
        assert_eq!(d.distmod().unit(), MAGNITUDE);
    }

    #[test]
    fn test_distmod_with_explicit_unit() {
        let d = Distance::builder().distmod(24.47).unit("lyr").build().unwrap();
        assert_eq!(d.unit(), LIGHT_YEAR);
        assert_relative_eq!(d.distmod().as_scalar().unwrap(), 24.47, epsilon = 1e-10);
    }

    #[test]
    fn test_distmod_quantity() {
        let dm = Quantity::scalar(15.0, MAGNITUDE).unwrap();
        let d = Distance::builder().distmod_quantity(&dm).build().unwrap();
        assert_eq!(d.unit(), KILOPARSEC);
        assert_relative_eq!(d.as_scalar().unwrap(), 10.0, max_relative = 1e-12);

        let not_mag = Quantity::scalar(10.0, PARSEC).unwrap();
        assert!(Distance::builder().distmod_quantity(&not_mag).build().is_err());
    }

    #[test]
    fn test_distmod_array_shares_one_unit() {
        let d = Distance::builder().distmod(array![5.0, 30.0]).build().unwrap();
        assert_eq!(d.unit(), MEGAPARSEC);
        let pc = d.pc();
        assert_relative_eq!(pc.as_slice().unwrap()[0], 100.0, max_relative = 1e-12);
        assert_relative_eq!(pc.as_slice().unwrap()[1], 1e7, max_relative = 1e-12);
    }

    #[test]
    fn test_from_redshift_with_explicit_cosmology() {
        let wmap5: Arc<dyn Cosmology> = Arc::new(FlatLambdaCdm::wmap5());
        let d = Distance::from_redshift(0.23, Some(wmap5.clone())).unwrap();
        assert_eq!(d.unit(), MEGAPARSEC);
        assert_eq!(d.as_scalar(), Some(wmap5.luminosity_distance_mpc(0.23)));

        let d_kpc = Distance::builder()
            .z(0.23)
            .cosmology(wmap5.clone())
            .unit(KILOPARSEC)
            .build()
            .unwrap();
        assert_eq!(d_kpc.unit(), KILOPARSEC);
        assert_relative_eq!(d_kpc.as_scalar().unwrap(), d.as_scalar().unwrap() * 1e3, max_relative = 1e-12);
    }

    #[rstest]
    #[case(FlatLambdaCdm::wmap5())]
    #[case(FlatLambdaCdm::wmap7())]
    #[case(FlatLambdaCdm::wmap9())]
    #[case(FlatLambdaCdm::planck13())]
    fn test_redshift_round_trip(#[case] cosmo: FlatLambdaCdm) {
        let cosmo: Arc<dyn Cosmology> = Arc::new(cosmo);
        for step in 1..=30 {
            let z = step as f64 * 0.1;
            let d = Distance::from_redshift(z, Some(cosmo.clone())).unwrap();
            let z_back = d.compute_z(Some(cosmo.as_ref())).unwrap();
            assert!(z_back > 0.0, "{}: z = {} came back as {}", cosmo.name(), z, z_back);
            assert_relative_eq!(z_back, z, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_compute_z_at_small_and_large_redshift() {
        let cosmo = FlatLambdaCdm::wmap7();
        for &z in &[1e-4, 0.01, 10.0] {
            let d = Distance::scalar(cosmo.luminosity_distance_mpc(z), MEGAPARSEC).unwrap();
            assert_relative_eq!(d.compute_z(Some(&cosmo)).unwrap(), z, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_compute_z_needs_a_positive_distance() {
        let cosmo = FlatLambdaCdm::wmap7();
        assert_eq!(Distance::scalar(0.0, PARSEC).unwrap().compute_z(Some(&cosmo)), Ok(0.0));
        for &d in &[-10.0, f64::NAN] {
            assert!(matches!(
                Distance::scalar(d, MEGAPARSEC).unwrap().compute_z(Some(&cosmo)),
                Err(CoordinateError::InvalidArguments(_))
            ));
        }
    }

    #[test]
    fn test_compute_z_is_scalar_only() {
        let d = Distance::new(vec![10.0, 20.0], MEGAPARSEC).unwrap();
        assert!(matches!(
            d.compute_z(Some(&FlatLambdaCdm::wmap7())),
            Err(CoordinateError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_to_other_unit() {
        let d = Distance::scalar(1.0, KILOPARSEC).unwrap();
        let pc = d.to("pc").unwrap();
        assert_eq!(pc.unit(), PARSEC);
        assert_relative_eq!(pc.as_scalar().unwrap(), 1000.0, max_relative = 1e-14);
        assert!(d.to(DEGREE).is_err());
    }

    #[test]
    fn test_arithmetic_stays_distance() {
        let a = Distance::scalar(1.0, KILOPARSEC).unwrap();
        let b = Distance::scalar(250.0, PARSEC).unwrap();

        let sum = (&a + &b).unwrap();
        assert_eq!(sum.unit(), KILOPARSEC);
        assert_relative_eq!(sum.as_scalar().unwrap(), 1.25, max_relative = 1e-14);

        let diff = (&a - &b).unwrap();
        assert_relative_eq!(diff.as_scalar().unwrap(), 0.75, max_relative = 1e-14);

        let scaled = a.clone() * 4.0;
        assert_eq!(scaled.unit(), KILOPARSEC);
        assert_eq!(scaled.as_scalar(), Some(4.0));
        assert_eq!((a.clone() / 2.0).as_scalar(), Some(0.5));
        assert_eq!((-a).as_scalar(), Some(-1.0));
    }

    #[test]
    fn test_float32_dtype() {
        let d = Distance::builder()
            .value(0.1)
            .unit(PARSEC)
            .dtype(Dtype::Float32)
            .build()
            .unwrap();
        assert_eq!(d.as_scalar(), Some(0.1f32 as f64));
    }
}
