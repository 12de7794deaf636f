//! # Property-Based Tests
//!
//! Ripple correctness and range invariants, checked with proptest.

use odometer_core::{Chain, ChainBuilder, Modulus, OverflowPolicy};
use proptest::collection::vec;
use proptest::prelude::*;

fn policy_strategy() -> impl Strategy<Value = OverflowPolicy> {
    prop_oneof![
        Just(OverflowPolicy::Carry),
        Just(OverflowPolicy::Sticky),
        Just(OverflowPolicy::Fault),
    ]
}

/// Carrying chain with bounded `moduli` and an unbounded terminal stage.
fn carrying_chain(moduli: &[u64]) -> Chain {
    moduli
        .iter()
        .enumerate()
        .fold(ChainBuilder::new(), |b, (i, &m)| b.stage(format!("s{}", i), m))
        .unbounded("top")
        .build()
        .expect("build")
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// After n ticks, stage i holds floor(n / (m0 * .. * m(i-1))) mod mi.
    #[test]
    fn ripple_matches_mixed_radix(
        moduli in vec(1u64..8, 1..5),
        ticks in 0u64..3000
    ) {
        let mut chain = carrying_chain(&moduli);
        let report = chain.advance(ticks);
        prop_assert_eq!(report.accepted, ticks);

        let values = chain.values();
        let mut weight = 1u64;
        for (i, &m) in moduli.iter().enumerate() {
            prop_assert_eq!(values[i], (ticks / weight) % m);
            weight *= m;
        }
        prop_assert_eq!(values[moduli.len()], ticks / weight);
        prop_assert_eq!(chain.total(), Some(u128::from(ticks)));
    }

    /// No reachable state has a value outside its stage's modulus.
    #[test]
    fn values_stay_in_range(
        stages in vec((1u64..6, policy_strategy()), 1..5),
        ticks in 0u64..500
    ) {
        let mut builder = ChainBuilder::new();
        for (i, (m, policy)) in stages.iter().enumerate() {
            builder = builder.stage(format!("s{}", i), *m).policy(*policy);
        }
        let mut chain = builder.build().expect("build");

        for _ in 0..ticks {
            let _ = chain.tick();
            for reading in chain.readings() {
                prop_assert!(reading.modulus.contains(reading.value));
            }
        }
    }

    /// A failed tick leaves every stage exactly as it was.
    #[test]
    fn failed_tick_is_atomic(
        stages in vec((1u64..5, policy_strategy()), 1..5),
        ticks in 0u64..200
    ) {
        let mut builder = ChainBuilder::new();
        for (i, (m, policy)) in stages.iter().enumerate() {
            builder = builder.stage(format!("s{}", i), *m).policy(*policy);
        }
        let mut chain = builder.build().expect("build");

        for _ in 0..ticks {
            let before = chain.values();
            match chain.tick() {
                Ok(outcome) if outcome.is_rejected() => {
                    prop_assert_eq!(chain.values(), before);
                }
                Ok(_) => {}
                Err(_) => {
                    prop_assert_eq!(chain.values(), before);
                }
            }
        }
    }

    /// Reading never mutates.
    #[test]
    fn reads_are_idempotent(moduli in vec(1u64..10, 1..4), ticks in 0u64..1000) {
        let mut chain = carrying_chain(&moduli);
        chain.advance(ticks);
        prop_assert_eq!(chain.readings(), chain.readings());
        prop_assert_eq!(chain.values(), chain.values());
    }

    /// Width is the digit count of modulus - 1.
    #[test]
    fn modulus_width_matches_decimal_length(m in 1u64..10_000_000) {
        let modulus = Modulus::bounded(m).expect("modulus");
        prop_assert_eq!(modulus.width(), (m - 1).to_string().len());
    }
}
