//! Property tests over random model configurations.

use proptest::prelude::*;
use sybil_core::config::ModelConfig;
use sybil_core::{AgentState, Simulation};

fn model_strategy() -> impl Strategy<Value = ModelConfig> {
    (1usize..40, 0.0f64..8.0, 0.0f64..=1.0, 0usize..6, 1usize..5, any::<bool>()).prop_flat_map(
        |(num_nodes, degree, chance, max_interactions, identities, gated)| {
            (0..=num_nodes).prop_map(move |initial_sybil_nodes| ModelConfig {
                num_nodes,
                avg_node_degree: degree,
                initial_sybil_nodes,
                sybil_identity_count: identities,
                normal_to_sybil_interaction_chance: chance,
                max_interactions_per_step: max_interactions,
                exposure_gated_conversion: gated,
                halt_when_saturated: false,
            })
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_step_preserves_invariants(model in model_strategy(), seed in any::<u64>()) {
        let mut sim = Simulation::new(&model, seed).unwrap();

        for expected_tick in 1..=20u64 {
            sim.step();
            prop_assert_eq!(sim.tick(), expected_tick);

            let row = sim.measure();
            prop_assert_eq!(row.normal + row.sybil, model.num_nodes);
            prop_assert!((0.0..=1.0).contains(&row.average_confidence));

            for agent in sim.agents() {
                prop_assert!((0.0..=1.0).contains(&agent.confidence_score));
                match agent.state {
                    AgentState::Sybil => {
                        prop_assert_eq!(agent.identities.len(), model.sybil_identity_count);
                    }
                    AgentState::Normal => {
                        prop_assert!(agent.identities.is_empty());
                    }
                }
            }
        }
        prop_assert_eq!(sim.time_series().len(), 21);
    }

    #[test]
    fn prop_sybil_count_never_decreases(model in model_strategy(), seed in any::<u64>()) {
        let mut sim = Simulation::new(&model, seed).unwrap();
        sim.run_for(15);

        let rows = sim.time_series().rows();
        prop_assert!(rows.windows(2).all(|w| w[1].sybil >= w[0].sybil));
    }
}
