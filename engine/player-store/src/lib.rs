//! # Player Store
//!
//! Data model for the canonical AFL Fantasy player datasets and lenient
//! JSON loading for both on-disk shapes:
//!
//! - the flat "all players" dataset (a JSON array of records)
//! - the team roster dataset (position buckets plus a bench sub-object)
//!
//! Field spellings follow the store files as they exist on disk: several
//! stats are duplicated under a legacy camel-case key (`breakEven`,
//! `averagePoints`) and both spellings are kept in sync so older readers
//! keep working.

pub mod error;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use store::{ParseStats, PlayerStore};
pub use types::{BenchRoster, PlayerRecord, TeamRoster};
