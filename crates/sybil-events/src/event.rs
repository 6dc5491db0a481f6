//! Event Types
//!
//! Interaction events emitted by the engine while a tick runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What an attack did to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackEffect {
    /// Low-confidence NORMAL target gained confidence.
    Corrupted,
    /// Fully confident NORMAL target turned SYBIL.
    Converted,
    NoEffect,
}

impl AttackEffect {
    pub fn all() -> &'static [AttackEffect] {
        &[
            AttackEffect::Corrupted,
            AttackEffect::Converted,
            AttackEffect::NoEffect,
        ]
    }
}

impl fmt::Display for AttackEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttackEffect::Corrupted => write!(f, "corrupted"),
            AttackEffect::Converted => write!(f, "converted"),
            AttackEffect::NoEffect => write!(f, "no_effect"),
        }
    }
}

impl FromStr for AttackEffect {
    type Err = EventParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "corrupted" => Ok(AttackEffect::Corrupted),
            "converted" => Ok(AttackEffect::Converted),
            "no_effect" => Ok(AttackEffect::NoEffect),
            other => Err(EventParseError::UnknownEffect(other.to_string())),
        }
    }
}

/// Error type for parsing event labels.
#[derive(Debug, Clone, PartialEq)]
pub enum EventParseError {
    UnknownEffect(String),
}

impl fmt::Display for EventParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventParseError::UnknownEffect(s) => write!(f, "unknown attack effect: '{}'", s),
        }
    }
}

impl std::error::Error for EventParseError {}

/// A single interaction recorded during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A confident SYBIL agent influenced a neighbor.
    Attack {
        tick: u64,
        attacker: u64,
        target: u64,
        effect: AttackEffect,
        /// Interactions the attacker has made so far this tick, this one included.
        interactions: usize,
    },
    /// A NORMAL agent turned SYBIL on its own.
    SelfConversion { tick: u64, agent: u64 },
}

impl Event {
    pub fn tick(&self) -> u64 {
        match self {
            Event::Attack { tick, .. } | Event::SelfConversion { tick, .. } => *tick,
        }
    }

    /// Agent that acted.
    pub fn actor(&self) -> u64 {
        match self {
            Event::Attack { attacker, .. } => *attacker,
            Event::SelfConversion { agent, .. } => *agent,
        }
    }

    /// True if some agent changed state because of this event.
    pub fn is_conversion(&self) -> bool {
        matches!(
            self,
            Event::SelfConversion { .. }
                | Event::Attack {
                    effect: AttackEffect::Converted,
                    ..
                }
        )
    }

    /// Serializes the event as a single JSON line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an event from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
