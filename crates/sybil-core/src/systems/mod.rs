//! ECS Systems
//!
//! Per-tick systems: agent activation, the interaction rule, and metrics collection.

pub mod activation;
pub mod interaction;
pub mod metrics;

pub use activation::{activate_agents, activation_order, advance_tick, clear_tick_events};
pub use interaction::{
    activate_agent, apply_influence, convert_to_sybil, drift_amount, influence_outcome,
    ActivationContext, InfluenceOutcome,
};
pub use metrics::{
    average_confidence_normal, check_halt, collect_metrics, count_state, measure,
    MetricsCollector,
};
