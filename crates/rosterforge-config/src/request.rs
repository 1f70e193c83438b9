//! User-facing generation parameters.

use rosterforge_core::{
    BatchRequest, RosterConfiguration, StackRequirement, MAX_LINEUP_COUNT,
};
use serde::{Deserialize, Serialize};

use crate::{invalid, ConfigError, GeneratorConfig};

/// Parameters of one generation request, as a user supplies them.
///
/// `exposure` is a percentage; `0` leaves exposure uncapped.
///
/// # Examples
///
/// ```
/// use rosterforge_config::{GenerationRequest, GeneratorConfig};
///
/// let request = GenerationRequest::from_params([
///     ("count", "10"),
///     ("team", "nyy"),
///     ("stack", "4"),
///     ("exposure", "30"),
///     ("exclude", "Hurt Guy, Slumping Guy"),
/// ]).unwrap();
///
/// assert_eq!(request.count, 10);
/// assert_eq!(request.team.as_deref(), Some("NYY"));
///
/// let batch = request.to_batch_request(&GeneratorConfig::default()).unwrap();
/// assert_eq!(batch.configuration.max_exposure, Some(0.3));
/// assert_eq!(batch.configuration.excluded.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GenerationRequest {
    #[serde(default = "default_count")]
    pub count: usize,

    /// Stack team code, upper-cased.
    #[serde(default)]
    pub team: Option<String>,

    /// Minimum players from the stack team.
    #[serde(default)]
    pub stack: usize,

    /// Exposure ceiling in percent of the batch.
    #[serde(default = "default_exposure")]
    pub exposure: f64,

    #[serde(default)]
    pub lock: Option<String>,

    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            count: default_count(),
            team: None,
            stack: 0,
            exposure: default_exposure(),
            lock: None,
            exclude: Vec::new(),
        }
    }
}

fn default_count() -> usize {
    5
}

fn default_exposure() -> f64 {
    100.0
}

impl GenerationRequest {
    /// Parses query-style parameters.
    ///
    /// Recognized keys are `count`, `team`, `stack`, `exposure`, `lock`, and
    /// `exclude` (comma separated, may repeat). Unknown keys are ignored and
    /// blank values keep the default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for values that are not numbers and
    /// [`ConfigError::Invalid`] for numbers out of range.
    pub fn from_params<'a, I>(params: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut request = Self::default();
        for (key, raw) in params {
            let value = raw.trim();
            if value.is_empty() {
                continue;
            }
            match key {
                "count" => request.count = parse_param(key, value)?,
                "team" => request.team = Some(value.to_uppercase()),
                "stack" => request.stack = parse_param(key, value)?,
                "exposure" => request.exposure = parse_param(key, value)?,
                "lock" => request.lock = Some(value.to_string()),
                "exclude" => request.exclude.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(str::to_string),
                ),
                _ => {}
            }
        }
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::Invalid(
                "count must be at least 1".to_string(),
            ));
        }
        if self.count > MAX_LINEUP_COUNT {
            return Err(ConfigError::Invalid(format!(
                "count must be at most {MAX_LINEUP_COUNT}, got {}",
                self.count
            )));
        }
        if !(0.0..=100.0).contains(&self.exposure) {
            return Err(ConfigError::Invalid(format!(
                "exposure must be between 0 and 100, got {}",
                self.exposure
            )));
        }
        Ok(())
    }

    /// Combines these parameters with the configured rules.
    pub fn to_batch_request(&self, config: &GeneratorConfig) -> Result<BatchRequest, ConfigError> {
        self.validate()?;
        let rules = config.roster_rules()?;

        let mut configuration = RosterConfiguration::new(rules)
            .with_attempt_multiplier(config.batch.attempt_multiplier)
            .with_excluded(self.exclude.iter().cloned());
        if let Some(team) = &self.team {
            configuration = configuration.with_stack(StackRequirement::new(team, self.stack));
        }
        if let Some(lock) = &self.lock {
            configuration = configuration.with_locked(lock.clone());
        }
        if self.exposure > 0.0 {
            configuration = configuration.with_max_exposure(self.exposure / 100.0);
        }

        configuration.validate().map_err(invalid)?;
        Ok(BatchRequest::new(self.count, configuration))
    }
}

fn parse_param<T: std::str::FromStr>(param: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Parse {
        param: param.to_string(),
        value: value.to_string(),
    })
}
