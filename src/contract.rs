//! Decoders for the read-only contract records the scheduler consumes.
//!
//! The contract writers that produce these records are out of scope; this
//! module only needs to stay byte-for-byte compatible with their encoding,
//! which is self-describing JSON — this crate reads it with `serde_json`
//! rather than substituting a binary format.

use std::collections::HashMap;

use alloy_primitives::Bytes;
use serde::Deserialize;

use crate::error::ScheduleError;

/// `nominate` → `{candidate_address: nomination_record}`. Only the key set
/// (the candidate addresses) is consumed; the nomination metadata itself is
/// opaque to the scheduler.
pub type NominateRecord = HashMap<String, serde_json::Value>;

/// `vote_<address>` → `{voter_address: ballots}`.
pub type VoteRecord = HashMap<String, i64>;

/// `urlmap` → `{validator_address: network_url}`.
pub type UrlMapRecord = HashMap<String, String>;

/// Decode a raw contract value, tagging any failure with the `(bucket, key)`
/// it came from so `ScheduleError::CorruptState` carries useful context.
pub fn decode<'a, T: Deserialize<'a>>(
    bucket: &str,
    key: &[u8],
    raw: &'a [u8],
) -> Result<T, ScheduleError> {
    serde_json::from_slice(raw).map_err(|e| ScheduleError::CorruptState {
        bucket: bucket.to_string(),
        key: Bytes::copy_from_slice(key),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_nominate_record() {
        let raw = br#"{"alice": {"stake": 10}, "bob": {"stake": 5}}"#;
        let record: NominateRecord = decode("tdpos", b"nominate", raw).unwrap();
        assert_eq!(record.len(), 2);
        assert!(record.contains_key("alice"));
    }

    #[test]
    fn decodes_vote_record() {
        let raw = br#"{"voter1": 3, "voter2": 7}"#;
        let record: VoteRecord = decode("tdpos", b"vote_alice", raw).unwrap();
        assert_eq!(record.values().sum::<i64>(), 10);
    }

    #[test]
    fn corrupt_record_is_reported_with_context() {
        let raw = b"not json";
        let err = decode::<VoteRecord>("tdpos", b"vote_alice", raw).unwrap_err();
        match err {
            ScheduleError::CorruptState { bucket, .. } => assert_eq!(bucket, "tdpos"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
