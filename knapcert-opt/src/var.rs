//! Proof variables: item variables and extension variables.

use knapcert_proof::VarLike;
use std::fmt;

/// Which partial sum an extension variable tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SumKind {
    /// `w<l>_<v>`: the weight of the first `l` items is at least `v`.
    Weight,
    /// `p<l>_<v>`: the profit of the first `l` items is at most `v`.
    Profit,
}

impl SumKind {
    /// Sign applied to item coefficients in the first definition half.
    pub(crate) fn sign(self) -> i64 {
        match self {
            Self::Weight => 1,
            Self::Profit => -1,
        }
    }

    fn prefix(self) -> char {
        match self {
            Self::Weight => 'w',
            Self::Profit => 'p',
        }
    }
}

/// Identity of an extension variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExtKey {
    /// A partial-sum threshold variable.
    Sum {
        /// Weight or profit.
        kind: SumKind,
        /// Number of items the sum ranges over.
        layer: usize,
        /// Threshold.
        value: i64,
    },
    /// The conjunction `w<l>_<weight> /\ p<l>_<profit>`.
    Conjunction {
        /// Layer.
        layer: usize,
        /// Weight sum of the state.
        weight: i64,
        /// Profit sum of the state.
        profit: i64,
    },
}

impl fmt::Display for ExtKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Sum { kind, layer, value } => write!(f, "{}{layer}_{value}", kind.prefix()),
            Self::Conjunction {
                layer,
                weight,
                profit,
            } => write!(f, "c{layer}_{weight}_{profit}"),
        }
    }
}

/// A variable of the knapsack proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Var {
    /// Item selection variable `x<i>`.
    Item(usize),
    /// Extension variable.
    Ext(ExtKey),
}

impl Var {
    /// The selection variable of item `i`.
    pub fn item(i: usize) -> Self {
        Self::Item(i)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item(i) => write!(f, "x{i}"),
            Self::Ext(key) => write!(f, "{key}"),
        }
    }
}

impl VarLike for Var {
    fn is_input(&self) -> bool {
        matches!(self, Self::Item(_))
    }
}
