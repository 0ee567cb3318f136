//! Errors surfaced by the scheduler.
//!
//! Every variant maps to one failure kind: a missing ledger height, a broken
//! snapshot read, an undecodable contract record, or too few nominated
//! candidates to fill a term.

use alloy_primitives::Bytes;

/// Errors returned by [`crate::election::Schedule`] and its helper components.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// The Ledger has no block at the requested height.
    #[error("height {height} unavailable from ledger")]
    HeightUnavailable {
        /// The height that was queried.
        height: i64,
    },

    /// Creating or reading from a snapshot reader failed.
    #[error("snapshot read failed at height {height} for bucket {bucket:?} key {key:?}")]
    SnapshotFailure {
        /// Height the snapshot was anchored at.
        height: i64,
        /// Bucket name queried.
        bucket: String,
        /// Key queried, rendered for diagnostics.
        key: Bytes,
    },

    /// A contract record could not be decoded.
    #[error("corrupt contract state in bucket {bucket:?} key {key:?}: {reason}")]
    CorruptState {
        /// Bucket name of the offending record.
        bucket: String,
        /// Key of the offending record.
        key: Bytes,
        /// Decode failure detail.
        reason: String,
    },

    /// Fewer candidates were nominated than `proposer_num` requires.
    #[error("only {found} candidates nominated, need at least {required}")]
    InsufficientProposers {
        /// Number of candidates found.
        found: usize,
        /// Number of candidates required (`proposer_num`).
        required: usize,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScheduleError>;
