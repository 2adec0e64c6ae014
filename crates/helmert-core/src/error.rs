use thiserror::Error;

/// Coarse classification of [`HelmertError`] for callers that only need to
/// decide how to report a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid transform type or parameter configuration.
    Configuration,
    /// Unusable station data.
    Data,
    /// Degenerate geometry or an unsolvable normal system.
    Numerical,
}

/// Errors produced while estimating or applying a Helmert transform.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HelmertError {
    #[error("unsupported transform type {0:?}, expected \"7\", \"8\" or \"9\"")]
    UnsupportedTransformType(String),

    #[error("unknown parameter name {0:?}")]
    UnknownParameter(String),

    #[error("parameter {0} is not configured")]
    MissingParameter(&'static str),

    #[error("parameter {0} is configured more than once")]
    DuplicateParameter(&'static str),

    #[error("invalid parameter value {0:?}, expected \"estimate\" or a number")]
    InvalidEstimateMarker(String),

    #[error("sigma threshold must be positive and finite, got {0}")]
    InvalidSigmaThreshold(f64),

    #[error("no selected station pairs between the two frames")]
    EmptyStationSet,

    #[error("non-positive variance {value:e} at observation {index}")]
    NonPositiveVariance { index: usize, value: f64 },

    #[error("length mismatch for {what}: expected {expected}, got {got}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("selection mask has {got} entries for {expected} station pairs")]
    SelectionMismatch { expected: usize, got: usize },

    #[error("station {0} has a non-finite coordinate or sigma")]
    NonFiniteCoordinate(String),

    #[error("normal matrix is singular or ill-conditioned (rcond {rcond:.3e}, {unknowns} unknowns, {equations} equations)")]
    SingularNormalMatrix {
        rcond: f64,
        unknowns: usize,
        equations: usize,
    },
}

impl HelmertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HelmertError::UnsupportedTransformType(_)
            | HelmertError::UnknownParameter(_)
            | HelmertError::MissingParameter(_)
            | HelmertError::DuplicateParameter(_)
            | HelmertError::InvalidEstimateMarker(_)
            | HelmertError::InvalidSigmaThreshold(_) => ErrorKind::Configuration,
            HelmertError::EmptyStationSet
            | HelmertError::NonPositiveVariance { .. }
            | HelmertError::LengthMismatch { .. }
            | HelmertError::SelectionMismatch { .. }
            | HelmertError::NonFiniteCoordinate(_) => ErrorKind::Data,
            HelmertError::SingularNormalMatrix { .. } => ErrorKind::Numerical,
        }
    }
}

/// Result type for Helmert operations.
pub type Result<T> = std::result::Result<T, HelmertError>;
