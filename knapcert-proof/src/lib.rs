//! knapcert Proof - Pseudo-Boolean Proof Logging
//!
//! This crate provides the proof side of knapcert:
//! - Literals and linear constraints generic over the variable type
//! - `pol` expressions over absolute and relative constraint ids
//! - A monotonic [`ConstraintCounter`]
//! - The [`ProofWriter`], which numbers, audits and writes statements in the
//!   VeriPB 2.0 text format
//!
//! # Examples
//!
//! ```
//! use knapcert_proof::{Conclusion, Constraint, ConstraintId, Lit, PolExpr, ProofWriter, VarLike};
//! use std::fmt;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Var {
//!     X(u32),
//!     Aux(u32),
//! }
//!
//! impl fmt::Display for Var {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         match self {
//!             Var::X(i) => write!(f, "x{i}"),
//!             Var::Aux(i) => write!(f, "a{i}"),
//!         }
//!     }
//! }
//!
//! impl VarLike for Var {
//!     fn is_input(&self) -> bool {
//!         matches!(self, Var::X(_))
//!     }
//! }
//!
//! // One input constraint, so the first derived constraint gets id 2.
//! let mut proof = ProofWriter::new(Vec::new(), 1).unwrap();
//! let a = Var::Aux(0);
//! let def = proof
//!     .redundant(
//!         Constraint::new(1).with(1, Lit::negative(a)).with(1, Lit::positive(Var::X(0))),
//!         a,
//!         false,
//!     )
//!     .unwrap();
//! let sum = proof
//!     .pol(PolExpr::new(ConstraintId::new(1)).plus(def).saturate())
//!     .unwrap();
//! assert_eq!(sum.get(), 3);
//! proof.conclude(Conclusion::Unsatisfiable).unwrap();
//! let text = String::from_utf8(proof.finish().unwrap()).unwrap();
//! assert!(text.starts_with("pseudo-Boolean proof version 2.0\nred 1 ~a0 1 x0 >= 1 ; a0 -> 0\n"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
pub mod constraint;
pub mod counter;
pub mod error;
pub mod literal;
pub mod statement;
pub mod writer;

pub use audit::ProofAudit;
pub use constraint::{Constraint, ConstraintId, ConstraintRef, PolExpr, PolOp, Term};
pub use counter::ConstraintCounter;
pub use error::{ProofError, ProofResult};
pub use literal::{Lit, VarLike};
pub use statement::{Conclusion, PROOF_HEADER, Statement, StatementKind};
pub use writer::{ProofStats, ProofWriter};
