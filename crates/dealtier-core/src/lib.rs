//! Core domain logic for Dealtier: records, tiering configuration, dimension
//! scorers, and pre-tier aggregation. Pure functions only; the pipeline,
//! classifier adapter, and any I/O live in the sibling crates.

pub mod aggregate;
pub mod config;
pub mod denylist;
pub mod record;
pub mod scorers;
pub mod tier;

pub use config::{ConfigError, TieringConfig};
pub use denylist::Denylist;
pub use record::{CategoryVerdict, CompanyRecord, DimensionScores, ScoredRecord};
pub use tier::{Tier, TierError, TierLabel};
