//! Error types for proof emission.

use thiserror::Error;

/// Error raised while emitting a proof.
///
/// Everything except [`ProofError::Io`] is raised by the self-audit and means
/// the caller tried to write a statement the checker would reject.
#[derive(Error, Debug)]
pub enum ProofError {
    /// Writing to the sink failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A statement references an id that has not been issued yet.
    #[error("reference to constraint {id} but only {last} constraints exist")]
    ForwardReference {
        /// Referenced id (as written).
        id: String,
        /// Last issued id.
        last: u64,
    },
    /// A statement references a deleted constraint.
    #[error("reference to deleted constraint {0}")]
    DeletedReference(u64),
    /// A non-input variable is used before any `red` introduced it.
    #[error("variable {0} used before its definition")]
    UndefinedVariable(String),
    /// A variable is introduced twice outside of a definition pair.
    #[error("variable {0} is already defined")]
    Redefinition(String),
    /// A `soli` line mentions a variable that is not part of the instance.
    #[error("solution mentions non-input variable {0}")]
    NotAnInputVariable(String),
    /// A deletion range is empty or reaches past the last issued id.
    #[error("invalid deletion range {from}..={to} (last issued id {last})")]
    InvalidRange {
        /// First id.
        from: u64,
        /// Last id.
        to: u64,
        /// Last issued id.
        last: u64,
    },
    /// A statement was emitted after the conclusion.
    #[error("proof already concluded")]
    Concluded,
}

/// Result type for proof operations.
pub type ProofResult<T> = Result<T, ProofError>;
