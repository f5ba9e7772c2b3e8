//! DP states and the per-layer state store.

use crate::instance::Item;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;

/// A reachable `(weight sum, profit sum)` pair.
///
/// Ordered by weight, then profit; this is the processing order of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct State {
    /// Weight sum of the selected items.
    pub weight: i64,
    /// Profit sum of the selected items.
    pub profit: i64,
}

impl State {
    /// The state of the empty prefix.
    pub const EMPTY: State = State {
        weight: 0,
        profit: 0,
    };

    /// Create a state.
    #[must_use]
    pub const fn new(weight: i64, profit: i64) -> Self {
        Self { weight, profit }
    }

    /// The state reached by also taking `item`.
    #[must_use]
    pub fn take(&self, item: &Item) -> Self {
        Self {
            weight: self.weight + item.weight,
            profit: self.profit + item.profit,
        }
    }

    /// Whether this state dominates `other`: no heavier, no less
    /// profitable, and different.
    pub fn dominates(&self, other: &State) -> bool {
        self != other && self.weight <= other.weight && self.profit >= other.profit
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.weight, self.profit)
    }
}

/// The live states of one layer with the choice prefix that reached each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layer {
    states: BTreeMap<State, Vec<bool>>,
}

impl Layer {
    /// Create an empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The single-state layer 0.
    pub fn initial() -> Self {
        let mut layer = Self::new();
        layer.insert(State::EMPTY, Vec::new());
        layer
    }

    /// Insert a state; an existing state keeps its first choice prefix.
    ///
    /// Returns `true` if the state was new.
    pub fn insert(&mut self, state: State, choices: Vec<bool>) -> bool {
        match self.states.entry(state) {
            Entry::Vacant(e) => {
                e.insert(choices);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Remove a state.
    pub fn remove(&mut self, state: &State) -> Option<Vec<bool>> {
        self.states.remove(state)
    }

    /// Whether the state is live.
    pub fn contains(&self, state: &State) -> bool {
        self.states.contains_key(state)
    }

    /// Live states in processing order.
    pub fn states(&self) -> impl Iterator<Item = &State> + '_ {
        self.states.keys()
    }

    /// Live states with their choice prefixes.
    pub fn iter(&self) -> impl Iterator<Item = (&State, &[bool])> + '_ {
        self.states.iter().map(|(s, c)| (s, c.as_slice()))
    }

    /// Number of live states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no state is live.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// All layers of a run, indexed by layer number.
///
/// Layers that are no longer needed can be released; their slot stays.
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    layers: Vec<Option<Layer>>,
}

impl StateStore {
    /// Create a store holding layer 0.
    pub fn new() -> Self {
        Self {
            layers: vec![Some(Layer::initial())],
        }
    }

    /// Append the next layer.
    pub fn push(&mut self, layer: Layer) {
        self.layers.push(Some(layer));
    }

    /// A layer, unless it was released.
    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index).and_then(Option::as_ref)
    }

    /// The most recent layer.
    pub fn last(&self) -> Option<&Layer> {
        self.layers.last().and_then(Option::as_ref)
    }

    /// Drop the states of a layer.
    pub fn release(&mut self, index: usize) {
        if let Some(slot) = self.layers.get_mut(index) {
            *slot = None;
        }
    }

    /// Indices of the layers still held.
    pub fn retained(&self) -> impl Iterator<Item = usize> + '_ {
        self.layers
            .iter()
            .enumerate()
            .filter(|(_, l)| l.is_some())
            .map(|(i, _)| i)
    }
}
