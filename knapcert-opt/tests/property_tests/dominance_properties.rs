//! Property-based tests for dominance pruning
//!
//! Tests:
//! - The sweep finds exactly the states some other state dominates
//! - Every pruned layer is an antichain
//! - Pruning only removes dominated states

use crate::common::certify_text;
use knapcert_opt::*;
use proptest::prelude::*;

fn layer_strategy() -> impl Strategy<Value = Layer> {
    prop::collection::vec((0i64..12, 0i64..12), 0..16).prop_map(|states| {
        let mut layer = Layer::new();
        for (w, p) in states {
            layer.insert(State::new(w, p), Vec::new());
        }
        layer
    })
}

proptest! {
    #[test]
    fn sweep_matches_pairwise_scan(layer in layer_strategy()) {
        let expected: Vec<State> = layer
            .states()
            .filter(|b| layer.states().any(|a| a.dominates(b)))
            .copied()
            .collect();
        prop_assert_eq!(dominated_states(&layer), expected);
    }

    #[test]
    fn pruned_layers_are_antichains(
        weights in prop::collection::vec(1i64..=6, 1..7),
        seed_profits in prop::collection::vec(1i64..=6, 7),
        capacity in 1i64..=15,
    ) {
        let profits = &seed_profits[..weights.len()];
        let inst = KnapsackInstance::new(&weights, profits, capacity).unwrap();
        let with = CertifyConfig { retain_layers: true, ..CertifyConfig::default() };
        let without = CertifyConfig { dominance: false, ..with.clone() };
        let (pruned, _) = certify_text(&inst, with);
        let (full, _) = certify_text(&inst, without);

        for l in 0..=inst.len() {
            let kept = pruned.layers.layer(l).unwrap();
            prop_assert!(is_antichain(kept));
            if l == 0 {
                continue;
            }
            // every kept state is reachable without pruning, and every
            // state missing from the pruned layer is dominated by a kept one
            let all = full.layers.layer(l).unwrap();
            for s in kept.states() {
                prop_assert!(all.contains(s));
            }
            for s in all.states().filter(|s| !kept.contains(s)) {
                prop_assert!(kept.states().any(|k| k.dominates(s)));
            }
        }
    }
}
