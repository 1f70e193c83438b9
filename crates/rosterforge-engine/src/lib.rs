//! RosterForge Engine - lineup generation
//!
//! One lineup is one binary program: [`build_model`] turns the pool, the
//! roster configuration, and the batch state into a [`Model`], a
//! [`MilpSolver`] solves it, and [`extract`] turns the assignment back into a
//! [`Lineup`]. [`LineupGenerator`] repeats this for a batch, feeding each
//! lineup back as a diversity constraint and an exposure count.
//!
//! # Example
//!
//! ```
//! use rosterforge_core::{BatchRequest, Player, PlayerTable, Position, RosterConfiguration};
//! use rosterforge_engine::LineupGenerator;
//!
//! let mut players = Vec::new();
//! for (position, count) in [
//!     (Position::Pitcher, 3),
//!     (Position::Catcher, 2),
//!     (Position::FirstBase, 2),
//!     (Position::SecondBase, 2),
//!     (Position::ThirdBase, 2),
//!     (Position::Shortstop, 2),
//!     (Position::Outfield, 4),
//! ] {
//!     for n in 0..count {
//!         let name = format!("{}{n}", position.code());
//!         players.push(Player::new(name, position, "SEA", 4700.0, 10.0 - n as f64));
//!     }
//! }
//! let table = PlayerTable::new(players).unwrap();
//!
//! let request = BatchRequest::new(2, RosterConfiguration::default());
//! let batch = LineupGenerator::new().generate(&table, &request).unwrap();
//!
//! assert!(batch.is_complete());
//! assert_eq!(batch.lineups[0].len(), 10);
//! assert_ne!(batch.lineups[0].names(), batch.lineups[1].names());
//! ```
//!
//! [`Model`]: rosterforge_milp::Model
//! [`Lineup`]: rosterforge_core::Lineup

pub mod builder;
pub mod controller;
pub mod extractor;
pub mod state;

pub use builder::build_model;
pub use controller::LineupGenerator;
pub use extractor::{extract, order_slots};
pub use rosterforge_milp::MilpSolver;
pub use state::BatchState;
