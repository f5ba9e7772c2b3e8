//! Pseudo-Boolean constraints, constraint identifiers and `pol` expressions.

use crate::literal::Lit;
use smallvec::SmallVec;
use std::fmt;

/// Identifier of a constraint in the proof database.
///
/// Ids start at 1; the input instance occupies the first ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConstraintId(u64);

impl ConstraintId {
    /// Create an id from its raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id issued right after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// The id issued right before this one.
    #[must_use]
    pub const fn prev(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A reference to an existing constraint, as used inside `pol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintRef {
    /// Absolute id.
    Abs(ConstraintId),
    /// The `n`-th most recent constraint (`1` is the last one).
    Last(u64),
}

impl ConstraintRef {
    /// Shorthand for [`ConstraintRef::Last`].
    #[must_use]
    pub const fn last(offset: u64) -> Self {
        Self::Last(offset)
    }
}

impl From<ConstraintId> for ConstraintRef {
    fn from(id: ConstraintId) -> Self {
        Self::Abs(id)
    }
}

impl fmt::Display for ConstraintRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abs(id) => write!(f, "{id}"),
            Self::Last(offset) => write!(f, "-{offset}"),
        }
    }
}

/// A weighted literal `coeff * lit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Term<V> {
    /// Coefficient (may be negative).
    pub coeff: i64,
    /// Literal.
    pub lit: Lit<V>,
}

impl<V: fmt::Display> fmt::Display for Term<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.coeff, self.lit)
    }
}

/// A linear pseudo-Boolean constraint `sum(terms) >= bound`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint<V> {
    terms: SmallVec<[Term<V>; 4]>,
    bound: i64,
}

impl<V: Copy> Constraint<V> {
    /// Create a constraint with no terms.
    #[must_use]
    pub fn new(bound: i64) -> Self {
        Self {
            terms: SmallVec::new(),
            bound,
        }
    }

    /// Create the clause `l1 + l2 + ... >= 1`.
    pub fn clause(lits: impl IntoIterator<Item = Lit<V>>) -> Self {
        Self {
            terms: lits.into_iter().map(|lit| Term { coeff: 1, lit }).collect(),
            bound: 1,
        }
    }

    /// Append a term.
    #[must_use]
    pub fn with(mut self, coeff: i64, lit: Lit<V>) -> Self {
        self.terms.push(Term { coeff, lit });
        self
    }

    /// Append a term in place.
    pub fn push(&mut self, coeff: i64, lit: Lit<V>) {
        self.terms.push(Term { coeff, lit });
    }

    /// The terms of the left-hand side.
    pub fn terms(&self) -> &[Term<V>] {
        &self.terms
    }

    /// The right-hand side.
    pub fn bound(&self) -> i64 {
        self.bound
    }

    /// Iterate over the variables mentioned by the constraint.
    pub fn vars(&self) -> impl Iterator<Item = V> + '_ {
        self.terms.iter().map(|t| t.lit.var())
    }
}

impl<V: Copy> Extend<Term<V>> for Constraint<V> {
    fn extend<I: IntoIterator<Item = Term<V>>>(&mut self, iter: I) {
        self.terms.extend(iter);
    }
}

impl<V: fmt::Display> fmt::Display for Constraint<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for term in &self.terms {
            write!(f, "{term} ")?;
        }
        write!(f, ">= {} ;", self.bound)
    }
}

/// One token of a reverse-polish `pol` expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolOp {
    /// Push a constraint.
    Push(ConstraintRef),
    /// Add the two topmost constraints.
    Add,
    /// Multiply the topmost constraint by a positive scalar.
    Multiply(u64),
    /// Saturate the topmost constraint.
    Saturate,
}

/// A `pol` derivation: a linear combination of existing constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolExpr {
    ops: SmallVec<[PolOp; 6]>,
}

impl PolExpr {
    /// Start an expression from a single constraint.
    pub fn new(start: impl Into<ConstraintRef>) -> Self {
        let mut ops = SmallVec::new();
        ops.push(PolOp::Push(start.into()));
        Self { ops }
    }

    /// Add another constraint to the running sum.
    #[must_use]
    pub fn plus(mut self, other: impl Into<ConstraintRef>) -> Self {
        self.ops.push(PolOp::Push(other.into()));
        self.ops.push(PolOp::Add);
        self
    }

    /// Multiply the running sum.
    #[must_use]
    pub fn multiply(mut self, factor: u64) -> Self {
        self.ops.push(PolOp::Multiply(factor));
        self
    }

    /// Saturate the running sum.
    #[must_use]
    pub fn saturate(mut self) -> Self {
        self.ops.push(PolOp::Saturate);
        self
    }

    /// The tokens in order.
    pub fn ops(&self) -> &[PolOp] {
        &self.ops
    }

    /// Iterate over the constraints the expression reads.
    pub fn references(&self) -> impl Iterator<Item = ConstraintRef> + '_ {
        self.ops.iter().filter_map(|op| match op {
            PolOp::Push(r) => Some(*r),
            _ => None,
        })
    }
}

impl fmt::Display for PolExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match op {
                PolOp::Push(r) => write!(f, "{r}")?,
                PolOp::Add => write!(f, "+")?,
                PolOp::Multiply(k) => write!(f, "{k} *")?,
                PolOp::Saturate => write!(f, "s")?,
            }
        }
        Ok(())
    }
}
