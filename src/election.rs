//! The Election Facade (§4.5): the scheduler's public surface, consumed by
//! the SMR/BFT driver as `GetLeader`/`GetValidators`/`GetIntAddress`/
//! `UpdateProposers`/`NotifyTermChanged`.
//!
//! Two ambiguous points in the upstream algorithm are resolved here by
//! following the evident *intent* rather than a literal (buggy) expression
//! — see DESIGN.md for the record of both decisions.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;

use crate::address::Address;
use crate::ballot::calculate_proposers;
use crate::config::{ScheduleConfig, NANOS_PER_MILLI, SNAPSHOT_LAG, URLMAP_KEY};
use crate::contract::{self, UrlMapRecord};
use crate::error::ScheduleError;
use crate::history::HistoryCache;
use crate::ledger::Ledger;
use crate::snapshot;
use crate::time::{self, Slot};

/// The mutable part of the facade's state: the current term's proposer list,
/// the address→URL map, and the current term number. Replaced as one unit
/// under a single `RwLock` so a reader never observes a proposers list
/// paired with a URL map from a different generation (§4.6 strategy (b)).
struct ElectionState {
    proposers: Vec<Address>,
    net_url_map: HashMap<Address, String>,
    cur_term: i64,
}

/// The TDPoS proposer-election scheduler.
///
/// Holds immutable configuration, a shared handle to the Ledger, this node's
/// own address, a mutex-guarded bounded history of past proposer sets, and
/// the read-write-locked current election state.
pub struct Schedule {
    config: ScheduleConfig,
    ledger: Arc<dyn Ledger>,
    address: Address,
    history: HistoryCache,
    state: RwLock<ElectionState>,
}

impl Schedule {
    /// Construct a scheduler. `initial_proposers` seeds the bootstrap window
    /// (`get_validators` for `round <= 3`, see S2) before any block has been
    /// produced under this scheduler's watch.
    pub fn new(
        config: ScheduleConfig,
        ledger: Arc<dyn Ledger>,
        address: Address,
        initial_proposers: Vec<Address>,
    ) -> Self {
        Self {
            config,
            ledger,
            address,
            history: HistoryCache::new(),
            state: RwLock::new(ElectionState {
                proposers: initial_proposers,
                net_url_map: HashMap::new(),
                cur_term: 0,
            }),
        }
    }

    /// This scheduler's own validator address.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Current term number.
    pub fn cur_term(&self) -> i64 {
        self.state.read().cur_term
    }

    /// Recompute proposers at the ledger tip; if they differ from the
    /// current set, merge the refreshed URL map and replace the proposer
    /// list. Returns whether a change occurred.
    ///
    /// A failure (missing ledger data, corrupt records, insufficient
    /// candidates) is logged and reported as `false`, leaving prior state
    /// intact — `UpdateProposers` never propagates an error to the caller.
    pub fn update_proposers(&self) -> bool {
        let tip_height = self.ledger.tip_block().height();

        let next = match calculate_proposers(&self.config, &*self.ledger, &self.history, tip_height) {
            Ok(p) => p,
            Err(err) => {
                tracing::warn!(%err, tip_height, "tdpos::update_proposers calculate_proposers failed");
                return false;
            }
        };

        if next == self.state.read().proposers {
            tracing::trace!(tip_height, "tdpos::update_proposers no change");
            return false;
        }

        let urlmap = match self.read_urlmap(tip_height) {
            Ok(m) => m,
            Err(err) => {
                tracing::warn!(%err, tip_height, "tdpos::update_proposers urlmap read failed");
                return false;
            }
        };

        let mut state = self.state.write();
        for (addr, url) in urlmap {
            state.net_url_map.insert(Address::from(addr.as_str()), url);
        }
        state.proposers = next;
        tracing::info!(tip_height, "tdpos::update_proposers rotated proposers");
        true
    }

    /// Recompute proposers at `height` and replace the current set if BFT
    /// is enabled and the computation succeeds and differs. Unlike
    /// `update_proposers`, the URL map is not refreshed.
    pub fn notify_term_changed(&self, height: i64) -> Result<(), ScheduleError> {
        if !self.config.enable_bft {
            return Ok(());
        }
        let proposers = calculate_proposers(&self.config, &*self.ledger, &self.history, height)?;
        let mut state = self.state.write();
        if proposers != state.proposers {
            tracing::info!(height, "tdpos::notify_term_changed rotated proposers");
            state.proposers = proposers;
        }
        Ok(())
    }

    /// The validator expected to lead round `round`.
    ///
    /// If a block already exists at `round`, its recorded proposer is
    /// authoritative (the upstream source actually returns this on the
    /// *error* branch of a height lookup due to a variable-shadowing bug;
    /// this implementation follows the evident intent instead — see
    /// DESIGN.md open question 1). Otherwise the leader is derived from the
    /// current wall clock, extrapolated forward if `round` is still in the
    /// future relative to the ledger tip.
    pub fn get_leader(&self, round: i64) -> Option<Address> {
        if !self.config.enable_bft {
            return None;
        }

        if let Some(block) = self.ledger.block_by_height(round) {
            tracing::debug!(round, "tdpos::get_leader historical lookup");
            return Some(block.proposer().clone());
        }

        let tip_height = self.ledger.tip_block().height();
        let mut t_now = now_nanos();
        if round > tip_height {
            t_now += (round - tip_height - 1) * self.config.period * NANOS_PER_MILLI;
        }

        let Slot { pos, .. } = time::schedule(&self.config, t_now);
        let validators = self.get_validators(round)?;
        validators.get(pos as usize).cloned()
    }

    /// The validator set in effect at `round`.
    ///
    /// Follows the latency invariant `validators(R) = proposers` whenever
    /// `round` falls in the three-block window `(tip - 3, tip]` that hasn't
    /// yet produced a new computed set (see DESIGN.md open question 2 for
    /// why this differs from the upstream source's mis-parenthesized
    /// condition).
    pub fn get_validators(&self, round: i64) -> Option<Vec<Address>> {
        if !self.config.enable_bft {
            return None;
        }

        if round <= SNAPSHOT_LAG {
            return Some(self.state.read().proposers.clone());
        }

        let tip_height = self.ledger.tip_block().height();
        if tip_height - SNAPSHOT_LAG < round && round <= tip_height {
            return Some(self.state.read().proposers.clone());
        }

        if let Some(cached) = self.history.lookup(round) {
            return Some(cached);
        }

        match calculate_proposers(&self.config, &*self.ledger, &self.history, round) {
            Ok(p) => Some(p),
            Err(err) => {
                tracing::warn!(%err, round, "tdpos::get_validators calculate_proposers failed");
                None
            }
        }
    }

    /// The network URL advertised for `addr`, if known.
    pub fn get_int_address(&self, addr: &Address) -> Option<String> {
        if !self.config.enable_bft {
            return None;
        }
        self.state.read().net_url_map.get(addr).cloned()
    }

    fn read_urlmap(&self, height: i64) -> Result<UrlMapRecord, ScheduleError> {
        let bucket = self.config.contract_bucket.as_str();
        let raw = snapshot::read_at_height(&*self.ledger, height, bucket, URLMAP_KEY.as_bytes())?;
        contract::decode(bucket, URLMAP_KEY.as_bytes(), &raw)
    }
}

fn now_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_nanos() as i64
}
