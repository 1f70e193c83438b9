//! RosterForge Core - Core types for daily fantasy lineup generation
//!
//! This crate provides the fundamental data model:
//! - Player records and the validated, immutable [`PlayerTable`]
//! - Roster rules and per-request [`RosterConfiguration`]
//! - [`Lineup`] and [`Batch`] results
//! - The [`LineupError`] taxonomy shared by every RosterForge crate

pub mod batch;
pub mod error;
pub mod lineup;
pub mod player;
pub mod roster;
pub mod table;

pub use batch::{Batch, BatchRequest, BatchStatus, PartialReason, MAX_LINEUP_COUNT};
pub use error::{LineupError, Result};
pub use lineup::{round_points, Lineup, SLOT_ORDER};
pub use player::{ParsePositionError, Player, Position};
pub use roster::{RosterConfiguration, RosterRules, StackRequirement};
pub use table::PlayerTable;
