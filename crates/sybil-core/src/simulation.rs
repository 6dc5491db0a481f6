//! Simulation
//!
//! Owns the ECS world and the per-tick schedule. Construction generates the
//! graph, binds one agent to every node and records the tick 0 metrics row;
//! each `step()` runs the schedule exactly once.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use petgraph::graph::NodeIndex;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use sybil_events::{Event, MetricsRow, TimeSeries};
use uuid::Uuid;

use crate::components::agent::{AgentId, AgentState, AgentView, Confidence};
use crate::components::network::{Network, NetworkGraph};
use crate::components::world::{InteractionParams, SimulationState};
use crate::config::{ConfigError, ModelConfig};
use crate::events::TickEvents;
use crate::interventions::{apply_intervention, find_agent, Intervention, InterventionError};
use crate::setup::{generate_network, get_spawn_summary, spawn_population, SpawnConfig};
use crate::systems::{
    activate_agents, advance_tick, check_halt, clear_tick_events, collect_metrics, count_state,
    measure, MetricsCollector,
};
use crate::SimRng;

/// A single seeded run of the model
pub struct Simulation {
    world: World,
    schedule: Schedule,
    run_id: Uuid,
}

impl Simulation {
    /// Build a run on a freshly generated Erdős–Rényi graph.
    pub fn new(model: &ModelConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(model, SmallRng::seed_from_u64(seed))
    }

    /// Same as [`Simulation::new`] with a caller-supplied RNG; the graph is
    /// drawn from it before any agent activation.
    pub fn with_rng(model: &ModelConfig, mut rng: SmallRng) -> Result<Self, ConfigError> {
        model.validate()?;
        let graph = generate_network(model.num_nodes, model.avg_node_degree, &mut rng)?;
        Ok(Self::build(model, graph, rng))
    }

    /// Build a run on a fixed topology. The node count comes from the graph.
    pub fn from_graph(
        model: &ModelConfig,
        graph: NetworkGraph,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let model = ModelConfig {
            num_nodes: graph.node_count(),
            ..model.clone()
        };
        model.validate()?;
        Ok(Self::build(&model, graph, SmallRng::seed_from_u64(seed)))
    }

    fn build(model: &ModelConfig, graph: NetworkGraph, rng: SmallRng) -> Self {
        let mut world = World::new();
        let mut network = Network::new(graph);
        spawn_population(&mut world, &mut network, &SpawnConfig::from(model));

        let edges = network.edge_count();
        world.insert_resource(network);
        world.insert_resource(SimRng(rng));
        world.insert_resource(SimulationState::with_halt_when_saturated(
            model.halt_when_saturated,
        ));
        world.insert_resource(InteractionParams::from(model));
        world.insert_resource(TickEvents::new());
        world.insert_resource(MetricsCollector::new());

        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems(
            (
                clear_tick_events,
                activate_agents,
                advance_tick,
                collect_metrics,
                check_halt,
            )
                .chain(),
        );

        let run_id = Uuid::new_v4();
        let summary = get_spawn_summary(&mut world);
        tracing::info!(
            %run_id,
            nodes = summary.total_agents,
            edges,
            sybil = summary.sybil,
            "simulation initialised"
        );

        let mut simulation = Self {
            world,
            schedule,
            run_id,
        };
        let initial = simulation.measure();
        simulation
            .world
            .resource_mut::<MetricsCollector>()
            .record(initial);
        simulation
    }

    /// Advance exactly one tick.
    pub fn step(&mut self) {
        self.schedule.run(&mut self.world);
    }

    /// Step up to `ticks` times, stopping early once the run halts.
    /// Returns the number of steps taken.
    pub fn run_for(&mut self, ticks: u64) -> u64 {
        let mut taken = 0;
        while taken < ticks && self.is_running() {
            self.step();
            taken += 1;
        }
        taken
    }

    pub fn tick(&self) -> u64 {
        self.world.resource::<SimulationState>().current_tick
    }

    pub fn is_running(&self) -> bool {
        self.world.resource::<SimulationState>().running
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn network(&self) -> &Network {
        self.world.resource::<Network>()
    }

    pub fn params(&self) -> &InteractionParams {
        self.world.resource::<InteractionParams>()
    }

    /// All agents as read-only views, in node order
    pub fn agents(&self) -> Vec<AgentView> {
        self.network()
            .bound_agents()
            .into_iter()
            .filter_map(|entity| AgentView::from_world(&self.world, entity))
            .collect()
    }

    pub fn agent(&self, id: AgentId) -> Option<AgentView> {
        let entity = find_agent(&self.world, id)?;
        AgentView::from_world(&self.world, entity)
    }

    pub fn agent_at_node(&self, node: usize) -> Option<AgentView> {
        let entity = self.network().agent_at(NodeIndex::new(node))?;
        AgentView::from_world(&self.world, entity)
    }

    fn agent_components(&self) -> impl Iterator<Item = (&AgentState, &Confidence)> + '_ {
        let world = &self.world;
        self.network()
            .bound_agents()
            .into_iter()
            .filter_map(move |entity| {
                Some((
                    world.get::<AgentState>(entity)?,
                    world.get::<Confidence>(entity)?,
                ))
            })
    }

    /// Metrics for the current state, without appending to the time series
    pub fn measure(&self) -> MetricsRow {
        measure(self.tick(), self.agent_components())
    }

    pub fn count(&self, state: AgentState) -> usize {
        count_state(self.agent_components().map(|(s, _)| s), state)
    }

    pub fn average_confidence_normal(&self) -> f64 {
        self.measure().average_confidence
    }

    pub fn time_series(&self) -> &TimeSeries {
        self.world.resource::<MetricsCollector>().series()
    }

    pub fn latest_metrics(&self) -> Option<&MetricsRow> {
        self.world.resource::<MetricsCollector>().latest()
    }

    /// Events recorded during the last step
    pub fn tick_events(&self) -> &[Event] {
        &self.world.resource::<TickEvents>().events
    }

    /// Take the last step's events, leaving the buffer empty
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.world.resource_mut::<TickEvents>().drain()
    }

    /// Apply an intervention between ticks
    pub fn apply(&mut self, intervention: &Intervention) -> Result<(), InterventionError> {
        apply_intervention(&mut self.world, intervention)
    }

    pub fn world(&self) -> &World {
        &self.world
    }
}
