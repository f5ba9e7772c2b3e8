//! Summary output.

use knapcert_opt::Certificate;
use serde::Serialize;

/// Run summary printed on stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Largest live layer.
    pub widest_layer: u64,
    /// Live states over all layers.
    pub total_states: u64,
    /// Transitions considered.
    pub total_transitions: u64,
    /// States removed by dominance.
    pub pruned_states: u64,
    /// Extension variables defined.
    pub extension_vars: u64,
    /// Proof statements written.
    pub proof_statements: u64,
    /// Certified optimum; `None` for an infeasible instance.
    pub optimum: Option<i64>,
    /// Number of items.
    pub items: usize,
    /// Seed the instance was generated with.
    pub seed: u64,
}

impl Summary {
    /// Build the summary of a finished run.
    pub fn new(certificate: &Certificate, items: usize, seed: u64) -> Self {
        let stats = &certificate.stats;
        Self {
            widest_layer: stats.widest_layer,
            total_states: stats.total_states,
            total_transitions: stats.total_transitions,
            pruned_states: stats.pruned_states,
            extension_vars: stats.extension_vars,
            proof_statements: stats.proof_statements,
            optimum: certificate.optimum(),
            items,
            seed,
        }
    }

    /// `widest_layer total_states total_transitions`
    pub fn text(&self) -> String {
        format!(
            "{} {} {}",
            self.widest_layer, self.total_states, self.total_transitions
        )
    }

    /// Single-line JSON object.
    pub fn json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
