//! Proof statements.

use crate::constraint::{Constraint, ConstraintId, PolExpr};
use crate::literal::Lit;
use std::fmt;

/// Version line written at the top of every proof.
pub const PROOF_HEADER: &str = "pseudo-Boolean proof version 2.0";

/// A single proof step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement<V> {
    /// Redundance-based strengthening with the witness `var -> value`.
    Red {
        /// The added constraint.
        constraint: Constraint<V>,
        /// Witness variable.
        var: V,
        /// Value the witness maps the variable to.
        value: bool,
    },
    /// Reverse unit propagation.
    Rup(Constraint<V>),
    /// Linear combination of existing constraints.
    Pol(PolExpr),
    /// Delete the constraints with ids in `from..=to`.
    DeleteRange {
        /// First deleted id.
        from: ConstraintId,
        /// Last deleted id.
        to: ConstraintId,
    },
    /// Log a full assignment of the input variables as a solution.
    Solution(Vec<Lit<V>>),
}

/// Kind of a [`Statement`], used for statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// `red`
    Red,
    /// `rup`
    Rup,
    /// `pol`
    Pol,
    /// `del range`
    Delete,
    /// `soli`
    Solution,
}

impl<V> Statement<V> {
    /// The kind of this statement.
    pub fn kind(&self) -> StatementKind {
        match self {
            Self::Red { .. } => StatementKind::Red,
            Self::Rup(_) => StatementKind::Rup,
            Self::Pol(_) => StatementKind::Pol,
            Self::DeleteRange { .. } => StatementKind::Delete,
            Self::Solution(_) => StatementKind::Solution,
        }
    }

    /// Number of fresh constraint ids the checker assigns to this statement.
    pub fn fresh_ids(&self) -> u64 {
        match self {
            Self::Red { .. } | Self::Rup(_) | Self::Pol(_) | Self::Solution(_) => 1,
            Self::DeleteRange { .. } => 0,
        }
    }
}

impl<V: fmt::Display + Copy> fmt::Display for Statement<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red {
                constraint,
                var,
                value,
            } => write!(f, "red {constraint} {var} -> {}", u8::from(*value)),
            Self::Rup(constraint) => write!(f, "rup {constraint}"),
            Self::Pol(expr) => write!(f, "pol {expr}"),
            Self::DeleteRange { from, to } => write!(f, "del range {from} {to}"),
            Self::Solution(lits) => {
                write!(f, "soli")?;
                for lit in lits {
                    write!(f, " {lit}")?;
                }
                Ok(())
            }
        }
    }
}

/// Final claim of a proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conclusion {
    /// The instance has no solution.
    Unsatisfiable,
    /// The optimal objective value lies in `lower..=upper`.
    Bounds {
        /// Lower bound on the objective.
        lower: i64,
        /// Upper bound on the objective.
        upper: i64,
    },
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsatisfiable => write!(f, "conclusion UNSATISFIABLE"),
            Self::Bounds { lower, upper } => write!(f, "conclusion BOUNDS {lower} {upper}"),
        }
    }
}
