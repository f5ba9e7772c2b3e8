//! Property-based tests for certification
//!
//! Tests:
//! - The certified optimum equals an independent DP and brute force
//! - The witness is feasible and attains the optimum
//! - Proof replay: ids, defined-before-use, deleted references
//! - Every definition and derived clause holds on feasible assignments
//! - Every `pol` implies the clause derived right after it
//! - Dominance and deletion never change the optimum

use crate::common::{brute_force, certify_text, check_derivations, check_semantics, replay};
use knapcert_opt::*;
use proptest::prelude::*;

fn instance() -> impl Strategy<Value = (Vec<i64>, Vec<i64>, i64)> {
    (0usize..7).prop_flat_map(|n| {
        (
            prop::collection::vec(1i64..=8, n),
            prop::collection::vec(1i64..=8, n),
            1i64..=20,
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn optimum_matches_reference((weights, profits, capacity) in instance()) {
        let inst = KnapsackInstance::new(&weights, &profits, capacity).unwrap();
        let (cert, _) = certify_text(&inst, CertifyConfig::default());
        prop_assert_eq!(cert.optimum(), Some(inst.reference_optimum()));
        prop_assert_eq!(cert.optimum(), Some(brute_force(&weights, &profits, capacity)));
    }

    #[test]
    fn witness_attains_optimum((weights, profits, capacity) in instance()) {
        let inst = KnapsackInstance::new(&weights, &profits, capacity).unwrap();
        let (cert, text) = certify_text(&inst, CertifyConfig::default());
        let Outcome::Optimal { profit, witness } = &cert.outcome else {
            return Err(TestCaseError::fail("empty selection is always feasible"));
        };
        prop_assert_eq!(witness.len(), inst.len());
        prop_assert!(inst.weight_of(witness) <= capacity);
        prop_assert_eq!(inst.profit_of(witness), *profit);

        let r = replay(&text).map_err(TestCaseError::fail)?;
        prop_assert_eq!(r.solution.as_ref(), Some(witness));
        let bounds = format!("BOUNDS {} {}", -profit, -profit);
        prop_assert_eq!(r.conclusion.as_deref(), Some(bounds.as_str()));
    }

    #[test]
    fn proof_replays_and_is_sound((weights, profits, capacity) in instance()) {
        let inst = KnapsackInstance::new(&weights, &profits, capacity).unwrap();
        let (cert, text) = certify_text(&inst, CertifyConfig::default());
        let r = replay(&text).map_err(TestCaseError::fail)?;
        prop_assert_eq!(r.statements, cert.stats.proof_statements);
        prop_assert_eq!(r.last_id, 1 + cert.stats.proof_statements - cert.stats.deletions);
        check_semantics(&inst, &r).map_err(TestCaseError::fail)?;
        check_derivations(&inst, &r).map_err(TestCaseError::fail)?;
    }

    #[test]
    fn configuration_does_not_change_optimum(
        (weights, profits, capacity) in instance(),
        dominance in any::<bool>(),
        lag in prop::option::of(2usize..5),
    ) {
        let inst = KnapsackInstance::new(&weights, &profits, capacity).unwrap();
        let config = CertifyConfig { dominance, deletion_lag: lag, retain_layers: false };
        let (cert, text) = certify_text(&inst, config);
        prop_assert_eq!(cert.optimum(), Some(inst.reference_optimum()));
        let r = replay(&text).map_err(TestCaseError::fail)?;
        check_semantics(&inst, &r).map_err(TestCaseError::fail)?;
        check_derivations(&inst, &r).map_err(TestCaseError::fail)?;
    }

    #[test]
    fn transitions_are_two_per_live_parent((weights, profits, capacity) in instance()) {
        let inst = KnapsackInstance::new(&weights, &profits, capacity).unwrap();
        let config = CertifyConfig { retain_layers: true, ..CertifyConfig::default() };
        let (cert, _) = certify_text(&inst, config);
        let parents: usize = (0..inst.len())
            .map(|l| cert.layers.layer(l).map_or(0, Layer::len))
            .sum();
        prop_assert_eq!(cert.stats.total_transitions, 2 * parents as u64);
        let live: usize = (1..=inst.len())
            .map(|l| cert.layers.layer(l).map_or(0, Layer::len))
            .sum();
        prop_assert_eq!(cert.stats.total_states, live as u64);
    }
}
