//! The Ledger facade the scheduler is built against.
//!
//! Production wires this to the real block store; tests and the demo binary
//! wire an in-memory fake (see [`crate::testutil`]). The trait captures
//! exactly the capability set the scheduler needs: tip height, block lookup
//! by height, and a snapshot reader keyed by block id.

use crate::address::Address;

/// Opaque block identifier, passed to [`Ledger::create_snapshot`].
pub type BlockId = Vec<u8>;

/// A ledger block, as far as the scheduler is concerned.
#[derive(Debug, Clone)]
pub struct Block {
    height: i64,
    block_id: BlockId,
    proposer: Address,
}

impl Block {
    /// Construct a block record.
    pub fn new(height: i64, block_id: BlockId, proposer: Address) -> Self {
        Self { height, block_id, proposer }
    }

    /// Block height.
    pub fn height(&self) -> i64 {
        self.height
    }

    /// Block id, opaque outside the Ledger.
    pub fn block_id(&self) -> &BlockId {
        &self.block_id
    }

    /// The validator that produced this block.
    pub fn proposer(&self) -> &Address {
        &self.proposer
    }
}

/// A versioned KV record read from a snapshot.
#[derive(Debug, Clone)]
pub struct VersionedRecord {
    /// The raw value stored under the queried key.
    pub value: Vec<u8>,
}

/// A read-only view of contract state anchored at a single block.
///
/// `Send` because the Election Facade may hand a snapshot reader across the
/// boundary of a single synchronous call without needing `Sync`: nothing
/// holds on to a `SnapshotReader` past the call that produced it.
pub trait SnapshotReader: Send {
    /// Read `(bucket, key)`; `None` if absent.
    fn get(&self, bucket: &str, key: &[u8]) -> Option<VersionedRecord>;
}

/// The external Ledger collaborator.
///
/// `Send + Sync` so it can be shared as `Arc<dyn Ledger>` across the
/// consensus-loop thread and any read-only query threads.
pub trait Ledger: Send + Sync {
    /// The chain tip.
    fn tip_block(&self) -> Block;

    /// Look up the block at `height`, if the ledger has one.
    fn block_by_height(&self, height: i64) -> Option<Block>;

    /// Create a snapshot reader anchored at `block_id`.
    fn create_snapshot(&self, block_id: &BlockId) -> Option<Box<dyn SnapshotReader>>;
}
