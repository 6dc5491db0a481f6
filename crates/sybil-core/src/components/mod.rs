//! ECS Components
//!
//! Agent components, the network resource and run-wide world state.

pub mod agent;
pub mod network;
pub mod world;

pub use agent::*;
pub use network::*;
pub use world::*;
