//! World Setup
//!
//! Network generation and agent spawning.

pub mod agents;
pub mod network;

pub use agents::*;
pub use network::*;
