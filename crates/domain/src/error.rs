//! Common error types used across the workspace.
//!
//! Each category is its own typed error; [`ZonefareError`] folds them
//! together through `#[from]` conversions. Adapters wrap their own failures
//! into [`ZonefareError::Storage`].

/// Top-level error returned by domain and application operations.
#[derive(Debug, thiserror::Error)]
pub enum ZonefareError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("data corruption: {0}")]
    DataCorruption(#[from] DataCorruptionError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error("contract violation: {0}")]
    ContractViolation(#[from] ContractViolation),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A user-supplied value broke a domain invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("unknown charge style: {0}")]
    UnknownChargeStyle(String),

    #[error("amount for radius {radius} must be a finite, non-negative number")]
    InvalidAmount { radius: String },

    #[error("submitted radiuses do not match the current table")]
    RadiusMismatch,
}

/// A looked-up record does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Malformed or degenerate geometry where a real one was required.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("polygon has no rings")]
    NoRings,

    #[error("ring {ring} has {vertices} distinct vertices, at least 3 are required")]
    TooFewVertices { ring: usize, vertices: usize },

    #[error("coordinate ({longitude}, {latitude}) is out of range")]
    OutOfRange { longitude: f64, latitude: f64 },

    #[error("no reference location is set")]
    MissingLocation,
}

/// A stored radius table violates its invariants.
///
/// Never auto-repaired: the table has to be fixed at the source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataCorruptionError {
    #[error("radius {0} appears more than once")]
    DuplicateRadius(i32),

    #[error("more than one open-ended (null) radius entry")]
    DuplicateSentinel,

    #[error("radius {0} is not a positive band number")]
    NonPositiveRadius(i32),

    #[error("radius sequence has a gap: expected {expected}, found {found}")]
    Gap { expected: i32, found: i32 },
}

/// A concurrent writer saved the profile first.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("profile {id} was modified concurrently (expected version {expected_version})")]
pub struct ConflictError {
    pub id: String,
    pub expected_version: i64,
}

/// An internal caller broke a precondition. Indicates a bug, not bad input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractViolation {
    #[error("max radius must not be negative, got {0}")]
    NegativeMaxRadius(i32),

    #[error("distance {0} m cannot be expressed as a radius")]
    UnrepresentableDistance(String),
}
