//! An in-memory [`Ledger`] fake, used by the in-crate unit tests and by the
//! `tests/` integration suite (enabled there via the `test-utils` feature).
//! Hand-rolled rather than built on a mocking crate.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::address::Address;
use crate::ledger::{Block, BlockId, Ledger, SnapshotReader, VersionedRecord};

type StateMap = HashMap<(String, Vec<u8>), Vec<u8>>;

struct Inner {
    blocks: Vec<Block>,
    /// `states[i]` is the cumulative contract KV state as of `blocks[i]`.
    states: Vec<StateMap>,
}

/// An in-memory, append-only ledger fake.
///
/// Starts with a single genesis block at height 0 and empty state. Each
/// subsequent pushed block may layer KV updates on top of the previous
/// block's cumulative state, so `create_snapshot(block_id)` always returns a
/// reader consistent with "contract state as of that block".
pub struct FakeLedger {
    inner: Mutex<Inner>,
}

impl FakeLedger {
    /// A fresh ledger containing only a genesis block at height 0.
    pub fn new() -> Self {
        let genesis = Block::new(0, vec![0], Address::from("genesis"));
        Self { inner: Mutex::new(Inner { blocks: vec![genesis], states: vec![HashMap::new()] }) }
    }

    /// Append a block with no KV updates (inherits the previous state).
    /// Returns the new block's height.
    pub fn push_block(&self, proposer: impl Into<Address>) -> i64 {
        self.push_block_with_state(proposer, Vec::new())
    }

    /// Append a block, layering `updates` onto the previous cumulative
    /// state. Returns the new block's height.
    pub fn push_block_with_state(
        &self,
        proposer: impl Into<Address>,
        updates: Vec<(&str, Vec<u8>, Vec<u8>)>,
    ) -> i64 {
        let mut inner = self.inner.lock().unwrap();
        let height = inner.blocks.last().unwrap().height() + 1;
        let block_id = (height as u64).to_be_bytes().to_vec();
        inner.blocks.push(Block::new(height, block_id, proposer.into()));

        let mut state = inner.states.last().unwrap().clone();
        for (bucket, key, value) in updates {
            state.insert((bucket.to_string(), key), value);
        }
        inner.states.push(state);
        height
    }

    /// Current tip height.
    pub fn tip_height(&self) -> i64 {
        self.inner.lock().unwrap().blocks.last().unwrap().height()
    }
}

impl Default for FakeLedger {
    fn default() -> Self {
        Self::new()
    }
}

struct FakeSnapshotReader {
    state: StateMap,
}

impl SnapshotReader for FakeSnapshotReader {
    fn get(&self, bucket: &str, key: &[u8]) -> Option<VersionedRecord> {
        self.state
            .get(&(bucket.to_string(), key.to_vec()))
            .map(|value| VersionedRecord { value: value.clone() })
    }
}

impl Ledger for FakeLedger {
    fn tip_block(&self) -> Block {
        self.inner.lock().unwrap().blocks.last().unwrap().clone()
    }

    fn block_by_height(&self, height: i64) -> Option<Block> {
        if height < 0 {
            return None;
        }
        let inner = self.inner.lock().unwrap();
        inner.blocks.get(height as usize).cloned()
    }

    fn create_snapshot(&self, block_id: &BlockId) -> Option<Box<dyn SnapshotReader>> {
        let inner = self.inner.lock().unwrap();
        let idx = inner.blocks.iter().position(|b| b.block_id() == block_id)?;
        Some(Box::new(FakeSnapshotReader { state: inner.states[idx].clone() }))
    }
}
