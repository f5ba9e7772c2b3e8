//! Deriving the optimality bound from the final layer.

use crate::error::{CertifyError, CertifyResult};
use crate::instance::KnapsackInstance;
use crate::layer::Layer;
use crate::symbols::SymbolTable;
use crate::var::Var;
use knapcert_proof::{Conclusion, Constraint, ConstraintRef, Lit, PolExpr, ProofWriter};
use serde::Serialize;
use std::io::Write;
use tracing::debug;

/// What the certificate proves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Outcome {
    /// `profit` is optimal and `witness` attains it.
    Optimal {
        /// Optimal total profit.
        profit: i64,
        /// Choice per item.
        witness: Vec<bool>,
    },
    /// No assignment satisfies the capacity.
    Infeasible,
}

impl Outcome {
    /// The optimal profit, if any.
    pub fn optimum(&self) -> Option<i64> {
        match self {
            Self::Optimal { profit, .. } => Some(*profit),
            Self::Infeasible => None,
        }
    }
}

/// Closes the proof once all layers are built.
pub struct Finalizer<'a> {
    instance: &'a KnapsackInstance,
}

impl<'a> Finalizer<'a> {
    /// Create a finalizer.
    pub fn new(instance: &'a KnapsackInstance) -> Self {
        Self { instance }
    }

    /// Emit the bound derivation, the witness and the conclusion.
    pub fn finish<W: Write>(
        &self,
        last: &Layer,
        symbols: &SymbolTable,
        proof: &mut ProofWriter<W, Var>,
    ) -> CertifyResult<Outcome> {
        if last.is_empty() {
            proof.conclude(Conclusion::Unsatisfiable)?;
            return Ok(Outcome::Infeasible);
        }

        let n = self.instance.len();
        let profits: Vec<_> = symbols.profits(n).collect();

        // profit <= x implies profit <= y for consecutive final profits x < y
        for pair in profits.windows(2) {
            let (lo, hi) = (pair[0].1, pair[1].1);
            proof.pol(
                PolExpr::new(symbols.definition(lo))
                    .plus(symbols.symbol(hi).reverse_definition())
                    .saturate(),
            )?;
            proof.rup(Constraint::clause([!symbols.lit(lo), symbols.lit(hi)]))?;
        }

        let top = match profits.last() {
            Some(&(value, var)) => {
                proof.rup(Constraint::clause([symbols.lit(var)]))?;
                Some((value, var))
            }
            None if n == 0 => None,
            None => return Err(CertifyError::MissingSymbol(format!("p{n}_*"))),
        };
        let best = top.map_or(0, |(value, _)| value);

        let (_, choices) = last
            .iter()
            .find(|(state, _)| state.profit == best)
            .ok_or_else(|| {
                CertifyError::Invariant(format!("no live state reaches profit {best}"))
            })?;
        let witness = choices.to_vec();

        proof.solution(
            witness
                .iter()
                .enumerate()
                .map(|(i, &take)| Lit::with_value(Var::item(i), take))
                .collect(),
        )?;
        if let Some((_, var)) = top {
            proof.pol(PolExpr::new(ConstraintRef::last(1)).plus(symbols.definition(var)))?;
        }

        let mut objective = Constraint::new(-best);
        objective.extend(self.instance.objective_terms());
        proof.rup(objective)?;
        proof.conclude(Conclusion::Bounds {
            lower: -best,
            upper: -best,
        })?;

        debug!(best, distinct_profits = profits.len(), "bound derived");
        Ok(Outcome::Optimal {
            profit: best,
            witness,
        })
    }
}
