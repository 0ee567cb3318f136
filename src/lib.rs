//! Deterministic TDPoS proposer-election scheduler.
//!
//! Answers two questions for a BFT consensus driver: who leads a given round
//! (`Schedule::get_leader`), and which validators make up the set in effect
//! at a given round (`Schedule::get_validators`). Both are pure functions of
//! ledger-committed contract state plus wall-clock time — no network I/O and
//! no independent persistence of its own.

mod address;
mod ballot;
mod config;
mod contract;
mod election;
mod error;
mod history;
mod ledger;
mod snapshot;
mod time;

#[cfg(any(test, feature = "test-utils"))]
pub mod testutil;

pub use address::Address;
pub use config::{ConfigError, ScheduleConfig};
pub use election::Schedule;
pub use error::{Result, ScheduleError};
pub use ledger::{Block, BlockId, Ledger, SnapshotReader, VersionedRecord};
pub use time::{schedule, Slot};
