//! Layer transitions and the proof steps that justify them.
//!
//! For every live state of layer `l` the builder derives, for both
//! successors, that the parent conjunction together with the choice for
//! item `l` implies the successor's weight, profit and conjunction
//! variables. When an item does not fit, it derives instead that the
//! parent forces the item off. A final clause states that some
//! conjunction of layer `l + 1` holds.

use crate::error::{CertifyError, CertifyResult};
use crate::instance::KnapsackInstance;
use crate::layer::Layer;
use crate::symbols::{StateVars, SymbolTable};
use crate::var::Var;
use knapcert_proof::{Constraint, Lit, PolExpr, ProofWriter};
use std::collections::BTreeSet;
use std::io::Write;

/// The result of building one layer.
#[derive(Debug, Clone, Default)]
pub struct TransitionOutcome {
    /// States of the next layer, before dominance.
    pub layer: Layer,
    /// Number of transitions considered (two per parent state).
    pub transitions: u64,
    /// Number of infeasible take transitions.
    pub infeasible: u64,
}

/// Builds layer `l + 1` from layer `l`.
pub struct TransitionBuilder<'a> {
    instance: &'a KnapsackInstance,
}

impl<'a> TransitionBuilder<'a> {
    /// Create a builder for an instance.
    pub fn new(instance: &'a KnapsackInstance) -> Self {
        Self { instance }
    }

    /// Expand every live state of `current` (layer `layer`) over item `layer`.
    pub fn build<W: Write>(
        &self,
        layer: usize,
        current: &Layer,
        symbols: &mut SymbolTable,
        proof: &mut ProofWriter<W, Var>,
    ) -> CertifyResult<TransitionOutcome> {
        let item = *self.instance.items().get(layer).ok_or_else(|| {
            CertifyError::Invariant(format!("no item for layer {layer}"))
        })?;
        let x = self.instance.item_lit(layer);
        let next_layer = layer + 1;
        let mut outcome = TransitionOutcome::default();
        let mut reached = BTreeSet::new();

        for (&state, choices) in current.iter() {
            outcome.transitions += 2;
            let parent = if layer == 0 {
                None
            } else {
                Some(symbols.existing_state_vars(layer, state)?)
            };

            // skip: the parent and ~x imply the same sums one layer on
            outcome.layer.insert(state, extend(choices, false));
            let skip = symbols.state_vars(proof, self.instance, next_layer, state)?;
            reached.insert(state);
            self.justify(symbols, proof, parent.as_ref(), x, &skip)?;

            let taken = state.take(&item);
            if taken.weight <= self.instance.capacity() {
                outcome.layer.insert(taken, extend(choices, true));
                let take = symbols.state_vars(proof, self.instance, next_layer, taken)?;
                reached.insert(taken);
                self.justify(symbols, proof, parent.as_ref(), !x, &take)?;

                if let Some(parent) = parent {
                    proof.rup(Constraint::clause([
                        !symbols.lit(parent.conjunction),
                        symbols.lit(skip.conjunction),
                        symbols.lit(take.conjunction),
                    ]))?;
                }
            } else {
                outcome.infeasible += 1;
                match parent {
                    None => {
                        proof.rup(Constraint::clause([!x]))?;
                    }
                    Some(parent) => {
                        let c = symbols.lit(parent.conjunction);
                        proof.pol(
                            PolExpr::new(KnapsackInstance::CAPACITY_CONSTRAINT)
                                .plus(symbols.definition(parent.weight))
                                .saturate(),
                        )?;
                        proof.rup(Constraint::clause([!symbols.lit(parent.weight), !x]))?;
                        proof.rup(Constraint::clause([!c, !x]))?;
                        proof.rup(Constraint::clause([!c, symbols.lit(skip.conjunction)]))?;
                    }
                }
            }
        }

        let mut at_least_one = Constraint::new(1);
        for state in &reached {
            let vars = symbols.existing_state_vars(next_layer, *state)?;
            at_least_one.push(1, symbols.lit(vars.conjunction));
        }
        proof.rup(at_least_one)?;

        Ok(outcome)
    }

    /// Derive `parent /\ guard -> target` for each of the three target
    /// variables, where `guard` is false exactly when the branch is taken.
    fn justify<W: Write>(
        &self,
        symbols: &SymbolTable,
        proof: &mut ProofWriter<W, Var>,
        parent: Option<&StateVars>,
        guard: Lit<Var>,
        target: &StateVars,
    ) -> CertifyResult<()> {
        let w = symbols.lit(target.weight);
        let p = symbols.lit(target.profit);
        let c = symbols.lit(target.conjunction);

        let Some(parent) = parent else {
            for lit in [w, p, c] {
                proof.rup(Constraint::clause([guard, lit]))?;
            }
            return Ok(());
        };

        let not_parent = !symbols.lit(parent.conjunction);
        proof.pol(
            PolExpr::new(symbols.definition(parent.weight))
                .plus(symbols.symbol(target.weight).reverse_definition())
                .saturate(),
        )?;
        proof.rup(Constraint::clause([not_parent, guard, w]))?;
        proof.pol(
            PolExpr::new(symbols.definition(parent.profit))
                .plus(symbols.symbol(target.profit).reverse_definition())
                .saturate(),
        )?;
        proof.rup(Constraint::clause([not_parent, guard, p]))?;
        proof.rup(Constraint::clause([not_parent, guard, c]))?;
        Ok(())
    }
}

fn extend(choices: &[bool], take: bool) -> Vec<bool> {
    let mut v = Vec::with_capacity(choices.len() + 1);
    v.extend_from_slice(choices);
    v.push(take);
    v
}
