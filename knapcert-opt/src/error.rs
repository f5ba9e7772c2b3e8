//! Error types for instance construction and certification.

use knapcert_proof::ProofError;
use thiserror::Error;

/// Error raised while building a knapsack instance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstanceError {
    /// Weights and profits have different lengths.
    #[error("{weights} weights but {profits} profits")]
    LengthMismatch {
        /// Number of weights.
        weights: usize,
        /// Number of profits.
        profits: usize,
    },
    /// An item has a non-positive weight.
    #[error("item {item} has non-positive weight {value}")]
    NonPositiveWeight {
        /// Item index.
        item: usize,
        /// Offending value.
        value: i64,
    },
    /// An item has a non-positive profit.
    #[error("item {item} has non-positive profit {value}")]
    NonPositiveProfit {
        /// Item index.
        item: usize,
        /// Offending value.
        value: i64,
    },
    /// The capacity is not positive.
    #[error("capacity must be positive, got {0}")]
    NonPositiveCapacity(i64),
    /// Sums of weights or profits do not fit into an `i64`.
    #[error("sum of weights and profits overflows")]
    Overflow,
}

/// Result type for instance operations.
pub type InstanceResult<T> = Result<T, InstanceError>;

/// Error raised while certifying an instance.
#[derive(Error, Debug)]
pub enum CertifyError {
    /// The proof writer rejected a statement or the sink failed.
    #[error("proof error: {0}")]
    Proof(#[from] ProofError),
    /// The instance is malformed.
    #[error("instance error: {0}")]
    Instance(#[from] InstanceError),
    /// The configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// An extension variable that must exist was never created.
    #[error("missing extension variable {0}")]
    MissingSymbol(String),
    /// An internal invariant of the certifier does not hold.
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

/// Result type for certification.
pub type CertifyResult<T> = Result<T, CertifyError>;
