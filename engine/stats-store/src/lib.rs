//! # Stats Store
//!
//! Storage layer for the game-center ingestion pipeline. It owns the
//! per-player domain records, turns one game's player map into
//! parameterized bulk upsert commands, and executes them against
//! Postgres.
//!
//! - **models**: `PlayerStats` and the three category records
//! - **batch**: per-game `BulkCommand` construction (one per entity
//!   type, size-bounded)
//! - **repository**: the `StatsSink` trait and its Postgres
//!   implementation
//!
//! See `schema.sql` for the table definitions the commands target.

pub mod batch;
pub mod error;
pub mod models;
pub mod repository;

pub use batch::{serialize, BulkCommand, MAX_ROWS_PER_COMMAND};
pub use error::{Result, StoreError};
pub use models::{PassingStats, PlayerStats, ReceivingStats, RushingStats, StatCategory};
pub use repository::{StatsRepository, StatsSink};
