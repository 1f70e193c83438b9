//! Entry points that hide the config, request, and solver wiring.

use std::path::Path;

use rosterforge_config::{GenerationRequest, GeneratorConfig};
use rosterforge_core::{Batch, PlayerTable, Result};
use rosterforge_engine::LineupGenerator;

/// Configuration file read by [`generate_lineups`] from the working directory.
pub const CONFIG_FILE: &str = "rosterforge.toml";

/// Generates a batch from query-style parameters.
///
/// Reads [`CONFIG_FILE`] when present and falls back to the default rules
/// otherwise. See [`GenerationRequest::from_params`] for the keys.
pub fn generate_lineups<'a, I>(table: &PlayerTable, params: I) -> Result<Batch>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    generate_with_config_file(table, params, CONFIG_FILE)
}

/// Generates a batch using the configuration at `path`.
///
/// A missing file means the default rules. A file that exists but does not
/// parse is reported as [`LineupError::Config`](rosterforge_core::LineupError::Config).
pub fn generate_with_config_file<'a, I>(
    table: &PlayerTable,
    params: I,
    path: impl AsRef<Path>,
) -> Result<Batch>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let config = GeneratorConfig::load_or_default(path)?;
    generate_with_config(table, params, &config)
}

/// Generates a batch from query-style parameters under `config`.
///
/// # Errors
///
/// Parameter and configuration problems surface as
/// [`LineupError::Config`](rosterforge_core::LineupError::Config); the rest
/// as [`LineupGenerator::generate`] reports them.
pub fn generate_with_config<'a, I>(
    table: &PlayerTable,
    params: I,
    config: &GeneratorConfig,
) -> Result<Batch>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    #[cfg(feature = "console")]
    rosterforge_console::init();

    let request = GenerationRequest::from_params(params)?;
    let batch_request = request.to_batch_request(config)?;
    LineupGenerator::from_config(config).generate(table, &batch_request)
}
