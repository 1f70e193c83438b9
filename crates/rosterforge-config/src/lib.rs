//! Configuration system for RosterForge.
//!
//! Load generator configuration from TOML or YAML files to change roster
//! rules, the attempt budget, and solver limits without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use rosterforge_config::GeneratorConfig;
//! use std::time::Duration;
//!
//! let config = GeneratorConfig::from_toml_str(r#"
//!     [roster]
//!     salary_floor = 40000
//!     salary_ceiling = 50000
//!
//!     [roster.quotas]
//!     P = 2
//!     C = 1
//!     1B = 1
//!     2B = 1
//!     3B = 1
//!     SS = 1
//!     OF = 3
//!
//!     [batch]
//!     attempt_multiplier = 4
//!
//!     [termination]
//!     seconds_spent_limit = 10
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(10)));
//! assert_eq!(config.batch.attempt_multiplier, 4);
//! assert_eq!(config.roster_rules().unwrap().salary_floor, 40000.0);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use rosterforge_config::GeneratorConfig;
//!
//! let config = GeneratorConfig::load_or_default("rosterforge.toml").unwrap();
//! // Proceeds with defaults if the file doesn't exist
//! ```

mod request;

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use rosterforge_core::{LineupError, Position, RosterRules};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use request::GenerationRequest;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid value '{value}' for parameter '{param}'")]
    Parse { param: String, value: String },
}

impl From<ConfigError> for LineupError {
    fn from(err: ConfigError) -> Self {
        LineupError::Config(err.to_string())
    }
}

/// Main generator configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GeneratorConfig {
    /// Lineup composition rules.
    #[serde(default)]
    pub roster: RosterConfig,

    /// Batch loop settings.
    #[serde(default)]
    pub batch: BatchConfig,

    /// Per-solve limits.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,
}

impl GeneratorConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, choosing the format by extension
    /// (`.yaml`/`.yml` for YAML, anything else as TOML).
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist or cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// A file that exists but cannot be read or parsed is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the per-solve time limit.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the per-solve node limit.
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.termination = Some(TerminationConfig {
            node_count_limit: Some(nodes),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the salary window.
    pub fn with_salary_range(mut self, floor: f64, ceiling: f64) -> Self {
        self.roster.salary_floor = floor;
        self.roster.salary_ceiling = ceiling;
        self
    }

    /// Sets the attempts allowed per requested lineup.
    pub fn with_attempt_multiplier(mut self, multiplier: usize) -> Self {
        self.batch.attempt_multiplier = multiplier;
        self
    }

    /// Returns the per-solve time limit, if configured.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// Returns the per-solve node limit, if configured.
    pub fn node_limit(&self) -> Option<u64> {
        self.termination.as_ref().and_then(|t| t.node_count_limit)
    }

    /// Converts the `[roster]` section into validated core rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for unknown position codes or
    /// inconsistent rules.
    pub fn roster_rules(&self) -> Result<RosterRules, ConfigError> {
        self.roster.to_rules()
    }
}

/// Lineup composition rules.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RosterConfig {
    #[serde(default = "default_salary_floor")]
    pub salary_floor: f64,

    #[serde(default = "default_salary_ceiling")]
    pub salary_ceiling: f64,

    #[serde(default = "default_roster_size")]
    pub roster_size: usize,

    /// Exact count per position code, e.g. `OF = 3`.
    #[serde(default = "default_quotas")]
    pub quotas: BTreeMap<String, usize>,

    #[serde(default = "default_min_hitters")]
    pub min_hitters: usize,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            salary_floor: default_salary_floor(),
            salary_ceiling: default_salary_ceiling(),
            roster_size: default_roster_size(),
            quotas: default_quotas(),
            min_hitters: default_min_hitters(),
        }
    }
}

impl RosterConfig {
    pub fn to_rules(&self) -> Result<RosterRules, ConfigError> {
        let mut quotas = BTreeMap::new();
        for (code, &count) in &self.quotas {
            let position: Position = code
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("roster.quotas: {e}")))?;
            quotas.insert(position, count);
        }
        let rules = RosterRules {
            salary_floor: self.salary_floor,
            salary_ceiling: self.salary_ceiling,
            roster_size: self.roster_size,
            quotas,
            min_hitters: self.min_hitters,
        };
        rules.validate().map_err(invalid)?;
        Ok(rules)
    }
}

/// Unwraps a core validation error into [`ConfigError::Invalid`].
pub(crate) fn invalid(err: LineupError) -> ConfigError {
    match err {
        LineupError::Config(msg) => ConfigError::Invalid(msg),
        other => ConfigError::Invalid(other.to_string()),
    }
}

fn default_salary_floor() -> f64 {
    RosterRules::default().salary_floor
}

fn default_salary_ceiling() -> f64 {
    RosterRules::default().salary_ceiling
}

fn default_roster_size() -> usize {
    RosterRules::default().roster_size
}

fn default_quotas() -> BTreeMap<String, usize> {
    RosterRules::default()
        .quotas
        .into_iter()
        .map(|(pos, count)| (pos.code().to_string(), count))
        .collect()
}

fn default_min_hitters() -> usize {
    RosterRules::default().min_hitters
}

/// Batch loop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BatchConfig {
    /// Solve attempts allowed per requested lineup.
    #[serde(default = "default_attempt_multiplier")]
    pub attempt_multiplier: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            attempt_multiplier: default_attempt_multiplier(),
        }
    }
}

fn default_attempt_multiplier() -> usize {
    3
}

/// Termination configuration for a single solve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend on one solve.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum milliseconds to spend on one solve, added to the seconds.
    pub millis_spent_limit: Option<u64>,

    /// Maximum branch-and-bound nodes per solve.
    pub node_count_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let millis =
            self.seconds_spent_limit.unwrap_or(0) * 1000 + self.millis_spent_limit.unwrap_or(0);
        if millis > 0 {
            Some(Duration::from_millis(millis))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests;
