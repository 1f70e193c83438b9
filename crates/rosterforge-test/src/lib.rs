//! Shared test fixtures for RosterForge crates.
//!
//! This crate provides player pools and lineup checks for testing.
//! It depends only on `rosterforge-core`, so any crate can use it.
//!
//! - [`pools`] - Hand-built pools with known optimal lineups
//! - [`random`] - Seeded random pools for property-style tests
//! - [`checks`] - Assertions over generated lineups
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! rosterforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```
//! use rosterforge_test::pools::quota_pool;
//! use rosterforge_test::random::RandomPool;
//!
//! let pool = quota_pool();
//! assert_eq!(pool.len(), 20);
//! let big = RandomPool::new(7).with_size(80).build();
//! assert_eq!(big.len(), 80);
//! ```

pub mod checks;
pub mod pools;
pub mod random;

pub use checks::{assert_distinct, assert_slot_order, assert_valid_lineup};
pub use pools::{deep_pool, quota_pool};
pub use random::RandomPool;
