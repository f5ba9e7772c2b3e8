//! CLI error type.

use knapcert_opt::{CertifyError, InstanceError};
use std::path::PathBuf;
use thiserror::Error;

/// Anything that makes a run fail after argument parsing.
#[derive(Error, Debug)]
pub enum CliError {
    /// Arguments clap could not rule out.
    #[error("usage: {0}")]
    Usage(String),
    /// A file could not be created or written.
    #[error("{}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The generated instance is invalid.
    #[error("instance error: {0}")]
    Instance(#[from] InstanceError),
    /// Certification failed.
    #[error("certification failed: {0}")]
    Certify(#[from] CertifyError),
    /// The summary could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// `--check` found a different optimum.
    #[error("certified optimum {certified:?} differs from reference optimum {reference}")]
    Mismatch {
        /// Optimum in the certificate.
        certified: Option<i64>,
        /// Optimum of the reference DP.
        reference: i64,
    },
}

impl CliError {
    /// Wrap an IO error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

/// Result type for the CLI.
pub type CliResult<T> = Result<T, CliError>;
