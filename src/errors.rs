//! Error types for distance and coordinate construction

use crate::numeric::ElementKind;
use crate::units::UnitsError;
use thiserror::Error;

/// Main error type for the astrodist library
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    /// A unit was missing, of the wrong dimension, or inconsistent
    #[error(transparent)]
    Units(#[from] UnitsError),

    /// Conflicting or out-of-range construction arguments
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Input that cannot be assembled into a numeric array of the right form
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Input elements that are not integers or floating-point numbers
    #[error("Unsupported dtype '{0}'")]
    UnsupportedDtype(ElementKind),

    /// The redshift minimizer did not converge
    #[error("Optimization error: {0}")]
    Optimization(String),
}

/// Result type for astrodist operations
pub type Result<T> = std::result::Result<T, CoordinateError>;
