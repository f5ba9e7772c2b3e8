//! The symbol table: extension variables and their definitions.
//!
//! Every extension variable is introduced exactly once, by a pair of `red`
//! statements, and is remembered together with the id of the first of the
//! two. Later `pol` steps combine these definitions, so losing an id here
//! would make the certificate unsound.

use crate::error::{CertifyError, CertifyResult};
use crate::instance::KnapsackInstance;
use crate::layer::State;
use crate::var::{ExtKey, SumKind, Var};
use knapcert_proof::{Constraint, ConstraintId, Lit, ProofWriter};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::io::Write;
use tracing::trace;

/// Handle of an extension variable in a [`SymbolTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExtVar(u32);

impl ExtVar {
    /// Index into the table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A defined extension variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    /// What the variable stands for.
    pub key: ExtKey,
    /// Id of the first `red` of its definition; the second is `definition + 1`.
    pub definition: ConstraintId,
}

impl Symbol {
    /// The proof variable.
    pub fn var(&self) -> Var {
        Var::Ext(self.key)
    }

    /// The positive literal.
    pub fn lit(&self) -> Lit<Var> {
        Lit::positive(self.var())
    }

    /// Id of the half that holds when the variable is false.
    pub fn reverse_definition(&self) -> ConstraintId {
        self.definition.next()
    }
}

/// The three variables describing one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateVars {
    /// Weight-sum variable.
    pub weight: ExtVar,
    /// Profit-sum variable.
    pub profit: ExtVar,
    /// Conjunction variable.
    pub conjunction: ExtVar,
}

#[derive(Debug, Default)]
struct LayerSymbols {
    weights: FxHashMap<i64, ExtVar>,
    profits: BTreeMap<i64, ExtVar>,
    conjunctions: FxHashMap<State, ExtVar>,
    released: bool,
}

/// Extension variables per layer, keyed by kind and value.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    layers: Vec<LayerSymbols>,
}

impl SymbolTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of variables ever defined.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether no variable was defined yet.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Look up a handle.
    pub fn symbol(&self, var: ExtVar) -> &Symbol {
        &self.symbols[var.index()]
    }

    /// Defining constraint id of a handle.
    pub fn definition(&self, var: ExtVar) -> ConstraintId {
        self.symbol(var).definition
    }

    /// Positive literal of a handle.
    pub fn lit(&self, var: ExtVar) -> Lit<Var> {
        self.symbol(var).lit()
    }

    /// Get or define the partial-sum variable `kind` at `layer` for `value`.
    pub fn sum_var<W: Write>(
        &mut self,
        proof: &mut ProofWriter<W, Var>,
        instance: &KnapsackInstance,
        kind: SumKind,
        layer: usize,
        value: i64,
    ) -> CertifyResult<ExtVar> {
        if let Some(var) = self.lookup_sum(kind, layer, value) {
            return Ok(var);
        }

        let key = ExtKey::Sum {
            kind,
            layer,
            value,
        };
        let var = Var::Ext(key);
        let sign = kind.sign();
        let big_m = instance.big_m();

        let mut on = Constraint::new(sign * value).with(big_m, Lit::negative(var));
        let mut off = Constraint::new(-sign * value + 1).with(big_m, Lit::positive(var));
        for (i, item) in instance.items().iter().take(layer).enumerate() {
            let coeff = match kind {
                SumKind::Weight => item.weight,
                SumKind::Profit => item.profit,
            };
            on.push(sign * coeff, instance.item_lit(i));
            off.push(-sign * coeff, instance.item_lit(i));
        }

        let definition = proof.redundant(on, var, false)?;
        proof.redundant(off, var, true)?;

        let handle = self.intern(key, definition)?;
        let slot = self.layer_mut(layer);
        match kind {
            SumKind::Weight => slot.weights.insert(value, handle),
            SumKind::Profit => slot.profits.insert(value, handle),
        };
        Ok(handle)
    }

    /// Get or define the conjunction variable of `state` at `layer`.
    ///
    /// Both sum variables of the state must already exist.
    pub fn conjunction_var<W: Write>(
        &mut self,
        proof: &mut ProofWriter<W, Var>,
        layer: usize,
        state: State,
    ) -> CertifyResult<ExtVar> {
        if let Some(var) = self.lookup_conjunction(layer, state) {
            return Ok(var);
        }
        let weight = self.require(
            self.lookup_sum(SumKind::Weight, layer, state.weight),
            layer,
            || format!("w{layer}_{}", state.weight),
        )?;
        let profit = self.require(
            self.lookup_sum(SumKind::Profit, layer, state.profit),
            layer,
            || format!("p{layer}_{}", state.profit),
        )?;

        let key = ExtKey::Conjunction {
            layer,
            weight: state.weight,
            profit: state.profit,
        };
        let var = Var::Ext(key);
        let (w, p) = (self.lit(weight), self.lit(profit));

        let definition = proof.redundant(
            Constraint::new(2)
                .with(2, Lit::negative(var))
                .with(1, w)
                .with(1, p),
            var,
            false,
        )?;
        proof.redundant(
            Constraint::clause([Lit::positive(var), !w, !p]),
            var,
            true,
        )?;

        let handle = self.intern(key, definition)?;
        self.layer_mut(layer).conjunctions.insert(state, handle);
        Ok(handle)
    }

    /// Get or define all three variables of `state` at `layer`, in the
    /// order weight, profit, conjunction.
    pub fn state_vars<W: Write>(
        &mut self,
        proof: &mut ProofWriter<W, Var>,
        instance: &KnapsackInstance,
        layer: usize,
        state: State,
    ) -> CertifyResult<StateVars> {
        let weight = self.sum_var(proof, instance, SumKind::Weight, layer, state.weight)?;
        let profit = self.sum_var(proof, instance, SumKind::Profit, layer, state.profit)?;
        let conjunction = self.conjunction_var(proof, layer, state)?;
        Ok(StateVars {
            weight,
            profit,
            conjunction,
        })
    }

    /// The variables of a state that must already be defined.
    pub fn existing_state_vars(&self, layer: usize, state: State) -> CertifyResult<StateVars> {
        Ok(StateVars {
            weight: self.require(
                self.lookup_sum(SumKind::Weight, layer, state.weight),
                layer,
                || format!("w{layer}_{}", state.weight),
            )?,
            profit: self.require(
                self.lookup_sum(SumKind::Profit, layer, state.profit),
                layer,
                || format!("p{layer}_{}", state.profit),
            )?,
            conjunction: self.require(
                self.lookup_conjunction(layer, state),
                layer,
                || format!("c{layer}_{}_{}", state.weight, state.profit),
            )?,
        })
    }

    /// Cached partial-sum variable, if defined.
    pub fn lookup_sum(&self, kind: SumKind, layer: usize, value: i64) -> Option<ExtVar> {
        let slot = self.layers.get(layer)?;
        match kind {
            SumKind::Weight => slot.weights.get(&value).copied(),
            SumKind::Profit => slot.profits.get(&value).copied(),
        }
    }

    /// Cached conjunction variable, if defined.
    pub fn lookup_conjunction(&self, layer: usize, state: State) -> Option<ExtVar> {
        self.layers.get(layer)?.conjunctions.get(&state).copied()
    }

    /// Profit-sum variables of a layer in ascending value order.
    pub fn profits(&self, layer: usize) -> impl Iterator<Item = (i64, ExtVar)> + '_ {
        self.layers
            .get(layer)
            .into_iter()
            .flat_map(|slot| slot.profits.iter().map(|(&v, &var)| (v, var)))
    }

    /// Forget the lookup maps of a layer whose definitions were deleted.
    ///
    /// Handles stay valid; a later lookup in the layer is an error.
    pub fn release_layer(&mut self, layer: usize) {
        if let Some(slot) = self.layers.get_mut(layer) {
            *slot = LayerSymbols {
                released: true,
                ..LayerSymbols::default()
            };
            trace!(layer, "released symbols");
        }
    }

    fn layer_mut(&mut self, layer: usize) -> &mut LayerSymbols {
        if self.layers.len() <= layer {
            self.layers.resize_with(layer + 1, LayerSymbols::default);
        }
        &mut self.layers[layer]
    }

    fn intern(&mut self, key: ExtKey, definition: ConstraintId) -> CertifyResult<ExtVar> {
        let index = u32::try_from(self.symbols.len())
            .map_err(|_| CertifyError::Invariant("too many extension variables".to_string()))?;
        self.symbols.push(Symbol { key, definition });
        Ok(ExtVar(index))
    }

    fn require(
        &self,
        found: Option<ExtVar>,
        layer: usize,
        name: impl FnOnce() -> String,
    ) -> CertifyResult<ExtVar> {
        match found {
            Some(var) => Ok(var),
            None if self.layers.get(layer).is_some_and(|s| s.released) => Err(
                CertifyError::MissingSymbol(format!("{} (layer {layer} released)", name())),
            ),
            None => Err(CertifyError::MissingSymbol(name())),
        }
    }
}
