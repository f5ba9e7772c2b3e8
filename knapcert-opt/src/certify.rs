//! The certification driver.
//!
//! Runs the layered DP: for every item the transition builder expands the
//! current layer, the dominance reducer prunes the new one, and old proof
//! constraints are deleted once no later step can reference them. The
//! finalizer closes the proof after the last layer.

use crate::dominance::{DominanceReducer, is_antichain};
use crate::error::{CertifyError, CertifyResult};
use crate::finalize::{Finalizer, Outcome};
use crate::instance::KnapsackInstance;
use crate::layer::{Layer, StateStore};
use crate::symbols::SymbolTable;
use crate::transition::TransitionBuilder;
use crate::var::Var;
use knapcert_proof::{ConstraintId, ProofWriter};
use serde::Serialize;
use std::io::Write;
use tracing::{debug, info};

/// Configuration for the certifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertifyConfig {
    /// Prune dominated states.
    pub dominance: bool,
    /// Delete the constraints emitted `lag` layers ago; `None` keeps everything.
    ///
    /// A lag below 2 would delete definitions still used by the next layer.
    pub deletion_lag: Option<usize>,
    /// Keep the states of every layer instead of releasing them.
    pub retain_layers: bool,
}

impl Default for CertifyConfig {
    fn default() -> Self {
        Self {
            dominance: true,
            deletion_lag: Some(2),
            retain_layers: false,
        }
    }
}

impl CertifyConfig {
    /// Smallest deletion lag that keeps the proof valid.
    pub const MIN_DELETION_LAG: usize = 2;

    /// Check the configuration.
    pub fn validate(&self) -> CertifyResult<()> {
        match self.deletion_lag {
            Some(lag) if lag < Self::MIN_DELETION_LAG => Err(CertifyError::Config(format!(
                "deletion lag must be at least {}, got {lag}",
                Self::MIN_DELETION_LAG
            ))),
            _ => Ok(()),
        }
    }
}

/// Statistics of a certification run.
///
/// State counts are taken after dominance, over layers `1..=n`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Largest number of live states in one layer.
    pub widest_layer: u64,
    /// Live states summed over all layers.
    pub total_states: u64,
    /// Transitions considered (two per expanded state).
    pub total_transitions: u64,
    /// Take transitions that exceeded the capacity.
    pub infeasible_transitions: u64,
    /// States removed by dominance.
    pub pruned_states: u64,
    /// Extension variables defined.
    pub extension_vars: u64,
    /// Proof statements written, conclusion excluded.
    pub proof_statements: u64,
    /// `del range` statements written.
    pub deletions: u64,
}

impl SearchStats {
    /// The `widest_layer total_states total_transitions` summary line.
    pub fn summary_line(&self) -> String {
        format!(
            "{} {} {}",
            self.widest_layer, self.total_states, self.total_transitions
        )
    }

    fn record_layer(&mut self, live: usize) {
        let live = live as u64;
        self.total_states += live;
        self.widest_layer = self.widest_layer.max(live);
    }
}

/// The result of a certification run.
#[derive(Debug, Clone)]
pub struct Certificate {
    /// What the proof concludes.
    pub outcome: Outcome,
    /// Run statistics.
    pub stats: SearchStats,
    /// Layers still held at the end; all of them with `retain_layers`.
    pub layers: StateStore,
}

impl Certificate {
    /// The certified optimum, if the instance is feasible.
    pub fn optimum(&self) -> Option<i64> {
        self.outcome.optimum()
    }
}

/// Drives a certification run.
#[derive(Debug, Clone, Default)]
pub struct Certifier {
    config: CertifyConfig,
}

impl Certifier {
    /// Create a certifier with the default configuration.
    pub fn new() -> Self {
        Self::with_config(CertifyConfig::default())
    }

    /// Create a certifier with a custom configuration.
    pub fn with_config(config: CertifyConfig) -> Self {
        Self { config }
    }

    /// Start a proof on `out` and certify `instance` into it.
    pub fn certify_to<W: Write>(
        &self,
        instance: &KnapsackInstance,
        out: W,
    ) -> CertifyResult<(Certificate, W)> {
        let mut proof = ProofWriter::new(out, KnapsackInstance::INPUT_CONSTRAINTS)?;
        let certificate = self.certify(instance, &mut proof)?;
        Ok((certificate, proof.finish()?))
    }

    /// Certify `instance` into a fresh proof writer.
    pub fn certify<W: Write>(
        &self,
        instance: &KnapsackInstance,
        proof: &mut ProofWriter<W, Var>,
    ) -> CertifyResult<Certificate> {
        self.config.validate()?;
        if proof.last_id() != KnapsackInstance::CAPACITY_CONSTRAINT || proof.stats().total() != 0
        {
            return Err(CertifyError::Invariant(
                "proof writer already holds statements".to_string(),
            ));
        }

        let n = instance.len();
        let mut store = StateStore::new();
        let mut symbols = SymbolTable::new();
        let mut reducer = DominanceReducer::new();
        let builder = TransitionBuilder::new(instance);
        let mut stats = SearchStats::default();
        let mut layer_starts: Vec<ConstraintId> = Vec::with_capacity(n);

        for layer in 0..n {
            layer_starts.push(proof.next_id());
            if let Some(lag) = self.config.deletion_lag
                && layer >= lag
            {
                let from = layer_starts[layer - lag];
                let to = layer_starts[layer - lag + 1].prev();
                proof.delete_range(from, to)?;
                stats.deletions += 1;
                if !self.config.retain_layers {
                    symbols.release_layer(layer - lag + 1);
                    store.release(layer - lag + 1);
                }
            }

            let current = store.layer(layer).ok_or_else(|| {
                CertifyError::Invariant(format!("layer {layer} was released too early"))
            })?;
            let built = builder.build(layer, current, &mut symbols, proof)?;
            stats.total_transitions += built.transitions;
            stats.infeasible_transitions += built.infeasible;

            let mut next: Layer = built.layer;
            let reached = next.len();
            let pruned = if self.config.dominance {
                let pruned = reducer.reduce(layer + 1, &mut next, &symbols, proof)?;
                if !is_antichain(&next) {
                    return Err(CertifyError::Invariant(format!(
                        "layer {} is not an antichain after pruning",
                        layer + 1
                    )));
                }
                pruned
            } else {
                0
            };

            stats.record_layer(next.len());
            debug!(
                layer = layer + 1,
                reached,
                pruned,
                live = next.len(),
                transitions = built.transitions,
                next_id = proof.next_id().get(),
                "layer built"
            );
            store.push(next);
        }

        let last = store
            .last()
            .ok_or_else(|| CertifyError::Invariant("no final layer".to_string()))?;
        let outcome = Finalizer::new(instance).finish(last, &symbols, proof)?;

        stats.pruned_states = reducer.stats().pruned;
        stats.extension_vars = symbols.len() as u64;
        stats.proof_statements = proof.stats().total();

        match &outcome {
            Outcome::Optimal { profit, .. } => info!(
                items = n,
                optimum = profit,
                states = stats.total_states,
                statements = stats.proof_statements,
                "certified optimum"
            ),
            Outcome::Infeasible => info!(items = n, "certified infeasibility"),
        }

        Ok(Certificate {
            outcome,
            stats,
            layers: store,
        })
    }
}
