//! Configuration System
//!
//! Loads model and run parameters from sybil.toml so experiments can be
//! adjusted without recompiling. Every field has a default, so a partial file
//! (or no file at all) is valid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "sybil.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub run: RunConfig,
}

/// Parameters of the dynamical system itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub num_nodes: usize,
    /// Target mean degree; edge probability is `avg_node_degree / num_nodes`.
    pub avg_node_degree: f64,
    /// The first this-many nodes start SYBIL.
    pub initial_sybil_nodes: usize,
    pub sybil_identity_count: usize,
    pub normal_to_sybil_interaction_chance: f64,
    pub max_interactions_per_step: usize,
    /// Only run the NORMAL self-conversion roll when a SYBIL neighbor exists.
    pub exposure_gated_conversion: bool,
    /// Clear the running flag once no NORMAL agent remains.
    pub halt_when_saturated: bool,
}

/// Parameters of a driven run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub seed: u64,
    pub ticks: u64,
    pub snapshot_interval: u64,
    pub output_dir: String,
    pub write_events: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            num_nodes: 10,
            avg_node_degree: 3.0,
            initial_sybil_nodes: 1,
            sybil_identity_count: 3,
            normal_to_sybil_interaction_chance: 0.3,
            max_interactions_per_step: 5,
            exposure_gated_conversion: false,
            halt_when_saturated: false,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            ticks: 100,
            snapshot_interval: 10,
            output_dir: "output".to_string(),
            write_events: true,
        }
    }
}

impl ModelConfig {
    /// Check the natural range constraints of every parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_nodes == 0 {
            return Err(ConfigError::invalid("num_nodes", "must be at least 1"));
        }
        if !self.avg_node_degree.is_finite() || self.avg_node_degree < 0.0 {
            return Err(ConfigError::invalid(
                "avg_node_degree",
                format!("must be a non-negative number, got {}", self.avg_node_degree),
            ));
        }
        if self.initial_sybil_nodes > self.num_nodes {
            return Err(ConfigError::invalid(
                "initial_sybil_nodes",
                format!(
                    "{} exceeds num_nodes ({})",
                    self.initial_sybil_nodes, self.num_nodes
                ),
            ));
        }
        let chance = self.normal_to_sybil_interaction_chance;
        if !(0.0..=1.0).contains(&chance) {
            return Err(ConfigError::invalid(
                "normal_to_sybil_interaction_chance",
                format!("must be within [0, 1], got {}", chance),
            ));
        }
        Ok(())
    }

    /// Erdős–Rényi edge probability, saturating at 1.
    pub fn edge_probability(&self) -> f64 {
        edge_probability(self.num_nodes, self.avg_node_degree)
    }
}

/// `avg_degree / n`, clamped into [0, 1].
pub fn edge_probability(num_nodes: usize, avg_degree: f64) -> f64 {
    if num_nodes == 0 {
        return 0.0;
    }
    (avg_degree / num_nodes as f64).clamp(0.0, 1.0)
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text and validate the model section
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.model.validate()?;
        Ok(config)
    }

    /// Load configuration from a path, or use defaults if it cannot be read
    ///
    /// A file that exists but fails validation is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::load(path.as_ref()) {
            Ok(config) => Ok(config),
            Err(ConfigError::IoError(e)) => {
                tracing::warn!(
                    "Could not read {}: {}. Using defaults.",
                    path.as_ref().display(),
                    e
                );
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
