//! Event System
//!
//! The per-tick event buffer and the append-only JSONL event log.

use bevy_ecs::prelude::*;
use sybil_events::Event;

pub mod logger;

pub use logger::EventLogger;

/// Resource storing events generated this tick
#[derive(Resource, Debug, Default)]
pub struct TickEvents {
    pub events: Vec<Event>,
}

impl TickEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
