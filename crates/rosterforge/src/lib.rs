//! RosterForge - MLB DFS lineup generation in Rust
//!
//! Hand over a player table and query-style parameters, get back a batch of
//! distinct, salary-legal lineups.
//!
//! # Example
//!
//! ```rust
//! use rosterforge::prelude::*;
//!
//! let mut players = Vec::new();
//! for (position, count) in [
//!     (Position::Pitcher, 4),
//!     (Position::Catcher, 2),
//!     (Position::FirstBase, 2),
//!     (Position::SecondBase, 2),
//!     (Position::ThirdBase, 2),
//!     (Position::Shortstop, 2),
//!     (Position::Outfield, 6),
//! ] {
//!     for n in 0..count {
//!         let team = if n % 2 == 0 { "BOS" } else { "NYY" };
//!         let name = format!("{}{n}", position.code());
//!         players.push(Player::new(name, position, team, 4750.0, 12.5 - n as f64));
//!     }
//! }
//! let table = PlayerTable::new(players).unwrap();
//!
//! let batch = generate_with_config(
//!     &table,
//!     [("count", "3"), ("team", "bos"), ("stack", "5")],
//!     &GeneratorConfig::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(batch.len(), 3);
//! for lineup in batch.iter() {
//!     assert!(lineup.count_team("BOS") >= 5);
//! }
//! ```

// Data model
pub use rosterforge_core::{
    round_points, Batch, BatchRequest, BatchStatus, Lineup, LineupError, PartialReason, Player,
    PlayerTable, Position, Result, RosterConfiguration, RosterRules, StackRequirement, SLOT_ORDER,
};

// Configuration
pub use rosterforge_config::{ConfigError, GenerationRequest, GeneratorConfig};

// Engine
pub use rosterforge_engine::{build_model, extract, order_slots, BatchState, LineupGenerator};

// Solver seam
pub use rosterforge_milp::{
    BranchAndBoundConfig, BranchAndBoundSolver, MilpSolver, Model, Solution, SolveStatistics,
    SolverError,
};

#[cfg(feature = "console")]
pub use rosterforge_console as console;

mod generate;
pub use generate::{generate_lineups, generate_with_config, generate_with_config_file, CONFIG_FILE};

pub mod prelude {
    pub use super::{generate_lineups, generate_with_config, generate_with_config_file};
    pub use super::{Batch, BatchStatus, Lineup, LineupError, Player, PlayerTable, Position};
    pub use super::{GenerationRequest, GeneratorConfig, LineupGenerator, RosterConfiguration};
}
