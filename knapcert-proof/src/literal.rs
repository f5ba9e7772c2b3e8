//! Literal Type for Pseudo-Boolean Proofs.
//!
//! Literals are generic over the variable type so that the proof layer stays
//! independent of the problem being certified.

use std::fmt;
use std::hash::Hash;
use std::ops::Not;

/// A variable that can appear in a proof line.
pub trait VarLike: Copy + Eq + Hash + fmt::Debug + fmt::Display {
    /// Whether the variable belongs to the input instance.
    ///
    /// Input variables are always in scope; every other variable must be
    /// introduced by a `red` statement before it is used.
    fn is_input(&self) -> bool;
}

/// A literal (possibly negated variable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lit<V> {
    var: V,
    negated: bool,
}

impl<V: Copy> Lit<V> {
    /// Create a positive literal from a variable.
    #[must_use]
    pub const fn positive(var: V) -> Self {
        Self {
            var,
            negated: false,
        }
    }

    /// Create a negative literal from a variable.
    #[must_use]
    pub const fn negative(var: V) -> Self {
        Self { var, negated: true }
    }

    /// Create a literal that is true iff `var` has the given value.
    #[must_use]
    pub const fn with_value(var: V, value: bool) -> Self {
        Self {
            var,
            negated: !value,
        }
    }

    /// Get the variable of this literal.
    #[must_use]
    pub const fn var(self) -> V {
        self.var
    }

    /// Check if this literal is negated.
    #[must_use]
    pub const fn is_negated(self) -> bool {
        self.negated
    }
}

impl<V> Not for Lit<V> {
    type Output = Self;

    fn not(self) -> Self {
        Self {
            var: self.var,
            negated: !self.negated,
        }
    }
}

impl<V: fmt::Display> fmt::Display for Lit<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "~{}", self.var)
        } else {
            write!(f, "{}", self.var)
        }
    }
}
