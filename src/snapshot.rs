//! The Snapshot Reader (§4.1): reads contract state as of `height - 3`,
//! the validator-change latency window that guarantees every node agrees on
//! the validator set for a given height.

use crate::config::SNAPSHOT_LAG;
use crate::error::ScheduleError;
use crate::ledger::Ledger;

/// Read `(bucket, key)` as of the block at `height - SNAPSHOT_LAG`.
///
/// Fails with `HeightUnavailable` if that block doesn't exist yet,
/// `SnapshotFailure` if the ledger can't produce a snapshot reader for it or
/// the key is absent — the scheduler never fabricates an empty ballot.
pub fn read_at_height(
    ledger: &dyn Ledger,
    height: i64,
    bucket: &str,
    key: &[u8],
) -> Result<Vec<u8>, ScheduleError> {
    let anchor = height - SNAPSHOT_LAG;

    let block = ledger.block_by_height(anchor).ok_or_else(|| {
        tracing::debug!(height, anchor, "tdpos::snapshot::block_by_height miss");
        ScheduleError::HeightUnavailable { height: anchor }
    })?;

    let reader = ledger.create_snapshot(block.block_id()).ok_or_else(|| {
        tracing::debug!(height, anchor, "tdpos::snapshot::create_snapshot failed");
        ScheduleError::SnapshotFailure {
            height,
            bucket: bucket.to_string(),
            key: key.to_vec().into(),
        }
    })?;

    let record = reader.get(bucket, key).ok_or_else(|| {
        tracing::debug!(height, bucket, ?key, "tdpos::snapshot::reader.get miss");
        ScheduleError::SnapshotFailure {
            height,
            bucket: bucket.to_string(),
            key: key.to_vec().into(),
        }
    })?;

    Ok(record.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeLedger;

    #[test]
    fn missing_anchor_block_is_height_unavailable() {
        let ledger = FakeLedger::new();
        let err = read_at_height(&ledger, 5, "tdpos", b"nominate").unwrap_err();
        assert!(matches!(err, ScheduleError::HeightUnavailable { height: 2 }));
    }

    #[test]
    fn reads_value_at_height_minus_three() {
        let ledger = FakeLedger::new();
        ledger.push_block_with_state(
            Vec::<u8>::new(),
            vec![("tdpos", b"nominate".to_vec(), br#"{"a":{}}"#.to_vec())],
        );
        // The update landed on block height 1; querying at height 4 anchors
        // on height 1 (4 - SNAPSHOT_LAG).
        let value = read_at_height(&ledger, 4, "tdpos", b"nominate").unwrap();
        assert_eq!(value, br#"{"a":{}}"#.to_vec());
    }
}
