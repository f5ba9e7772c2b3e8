//! Dominance pruning of a freshly built layer.
//!
//! A state dominates another when it is no heavier and no less profitable.
//! Pruning runs in two phases: first every dominated state is collected,
//! then each one is linked to a surviving dominator in the proof and all
//! of them are removed together. Since dominance is a strict partial order
//! on distinct states, every dominated state has an undominated dominator,
//! so the survivors form an antichain.

use crate::error::{CertifyError, CertifyResult};
use crate::layer::{Layer, State};
use crate::symbols::SymbolTable;
use crate::var::Var;
use knapcert_proof::{Constraint, PolExpr, ProofWriter};
use std::io::Write;
use tracing::trace;

/// Dominance statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DominanceStats {
    /// States removed.
    pub pruned: u64,
    /// Layers that had at least one dominated state.
    pub layers_pruned: u64,
}

/// Removes dominated states from layers and justifies each removal.
#[derive(Debug, Default)]
pub struct DominanceReducer {
    stats: DominanceStats,
}

impl DominanceReducer {
    /// Create a reducer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics so far.
    pub fn stats(&self) -> &DominanceStats {
        &self.stats
    }

    /// Prune `layer` (layer number `index`); returns the number of removed states.
    pub fn reduce<W: Write>(
        &mut self,
        index: usize,
        layer: &mut Layer,
        symbols: &SymbolTable,
        proof: &mut ProofWriter<W, Var>,
    ) -> CertifyResult<usize> {
        let dominated = dominated_states(layer);
        if dominated.is_empty() {
            return Ok(0);
        }

        let survivors: Vec<State> = layer
            .states()
            .filter(|s| dominated.binary_search(s).is_err())
            .copied()
            .collect();

        for worse in &dominated {
            let better = first_dominator(&survivors, worse).ok_or_else(|| {
                CertifyError::Invariant(format!(
                    "no surviving dominator for state {worse} at layer {index}"
                ))
            })?;
            trace!(layer = index, %worse, %better, "dominated");

            let b = symbols.existing_state_vars(index, *worse)?;
            let a = symbols.existing_state_vars(index, better)?;

            proof.pol(
                PolExpr::new(symbols.definition(b.weight))
                    .plus(symbols.symbol(a.weight).reverse_definition())
                    .saturate(),
            )?;
            proof.rup(Constraint::clause([
                !symbols.lit(b.weight),
                symbols.lit(a.weight),
            ]))?;
            proof.pol(
                PolExpr::new(symbols.definition(b.profit))
                    .plus(symbols.symbol(a.profit).reverse_definition())
                    .saturate(),
            )?;
            proof.rup(Constraint::clause([
                !symbols.lit(b.profit),
                symbols.lit(a.profit),
            ]))?;
            proof.rup(Constraint::clause([
                !symbols.lit(b.conjunction),
                symbols.lit(a.conjunction),
            ]))?;
        }

        for worse in &dominated {
            layer.remove(worse);
        }
        self.stats.pruned += dominated.len() as u64;
        self.stats.layers_pruned += 1;
        Ok(dominated.len())
    }
}

/// Every state of `layer` dominated by another state of it, in key order.
///
/// Sweeps the states by ascending weight: a state is dominated when an
/// earlier weight reaches at least its profit, or when a state of the same
/// weight has more profit.
pub fn dominated_states(layer: &Layer) -> Vec<State> {
    let states: Vec<State> = layer.states().copied().collect();
    let mut dominated = Vec::new();
    let mut best_lighter: Option<i64> = None;

    let mut i = 0;
    while i < states.len() {
        let weight = states[i].weight;
        let mut j = i;
        while j < states.len() && states[j].weight == weight {
            j += 1;
        }
        let group = &states[i..j];
        let top = group[group.len() - 1].profit;
        for (k, s) in group.iter().enumerate() {
            let beaten_by_lighter = best_lighter.is_some_and(|p| p >= s.profit);
            let beaten_in_group = k + 1 < group.len();
            if beaten_by_lighter || beaten_in_group {
                dominated.push(*s);
            }
        }
        best_lighter = Some(best_lighter.map_or(top, |p| p.max(top)));
        i = j;
    }
    dominated
}

/// Whether no state of `layer` dominates another.
pub fn is_antichain(layer: &Layer) -> bool {
    dominated_states(layer).is_empty()
}

/// The first state of `survivors` (in key order) dominating `worse`.
///
/// `survivors` is an antichain sorted by weight, so profits increase too
/// and the candidates form a suffix.
fn first_dominator(survivors: &[State], worse: &State) -> Option<State> {
    let start = survivors.partition_point(|s| s.profit < worse.profit);
    survivors
        .get(start)
        .copied()
        .filter(|s| s.dominates(worse))
}
