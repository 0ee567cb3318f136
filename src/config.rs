//! Static scheduler configuration.
//!
//! Fixed at construction and never mutated afterwards. There is
//! deliberately no CLI/env-driven loader here — callers build this in code,
//! the way the demo binary does.

/// Contract bucket the scheduler reads nominate/vote/urlmap records from.
pub const DEFAULT_CONTRACT_BUCKET: &str = "tdpos";

/// Key under which the candidate→nomination-metadata map is stored.
pub const NOMINATE_KEY: &str = "nominate";

/// Prefix of the per-candidate vote-tally key (`vote_<address>`).
pub const VOTE_KEY_PREFIX: &str = "vote_";

/// Key under which the address→network-URL map is stored.
pub const URLMAP_KEY: &str = "urlmap";

/// Validator-change latency, in blocks: a ballot change committed at height H
/// only takes effect for `validators(H + 3)` onward.
pub const SNAPSHOT_LAG: i64 = 3;

/// Maximum number of `(height, proposers)` entries retained by the
/// [`crate::history::HistoryCache`].
pub const MAX_HIS: usize = 100;

/// Nanoseconds per millisecond, the load-bearing conversion factor between
/// `period` (configured in ms) and the nanosecond timestamps `GetLeader`
/// extrapolates with.
pub const NANOS_PER_MILLI: i64 = 1_000_000;

/// Static scheduler configuration, immutable for the lifetime of a
/// [`crate::election::Schedule`].
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Minimum gap, in milliseconds, between consecutive blocks from the same
    /// validator.
    pub period: i64,
    /// Blocks produced per validator per rotation slot.
    pub block_num: i64,
    /// Validators elected per term (`K`).
    pub proposer_num: i64,
    /// Gap, in milliseconds, between two consecutive validators in a term.
    pub alternate_interval: i64,
    /// Gap, in milliseconds, between terms.
    pub term_interval: i64,
    /// Genesis reference instant for all time arithmetic, in the same units
    /// as the timestamps passed to [`crate::time::schedule`].
    pub init_timestamp: i64,
    /// Gates all BFT-only facade behavior
    /// (`GetLeader`/`GetValidators`/`GetIntAddress`/`NotifyTermChanged`).
    pub enable_bft: bool,
    /// Contract bucket nominate/vote/urlmap records live under.
    pub contract_bucket: String,
}

/// Error returned by [`ScheduleConfig::new`] when a field violates an
/// arithmetic precondition the rest of the scheduler assumes holds.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `proposer_num` must be positive — a term needs at least one slot.
    #[error("proposer_num must be > 0, got {0}")]
    ZeroProposerNum(i64),
    /// `period` must be positive — it is a divisor in the time scheduler.
    #[error("period must be > 0, got {0}")]
    ZeroPeriod(i64),
    /// `block_num` must be positive — it is a divisor in `pos_time`.
    #[error("block_num must be > 0, got {0}")]
    ZeroBlockNum(i64),
}

impl ScheduleConfig {
    /// Build a config, validating the arithmetic preconditions `pos_time`
    /// and `term_time` (§4.4) rely on: `proposer_num`, `period`, and
    /// `block_num` must all be strictly positive, or later division would
    /// panic or silently misbehave.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        period: i64,
        block_num: i64,
        proposer_num: i64,
        alternate_interval: i64,
        term_interval: i64,
        init_timestamp: i64,
        enable_bft: bool,
    ) -> Result<Self, ConfigError> {
        if proposer_num <= 0 {
            return Err(ConfigError::ZeroProposerNum(proposer_num));
        }
        if period <= 0 {
            return Err(ConfigError::ZeroPeriod(period));
        }
        if block_num <= 0 {
            return Err(ConfigError::ZeroBlockNum(block_num));
        }
        Ok(Self {
            period,
            block_num,
            proposer_num,
            alternate_interval,
            term_interval,
            init_timestamp,
            enable_bft,
            contract_bucket: DEFAULT_CONTRACT_BUCKET.to_string(),
        })
    }

    /// `term_time = term_interval + (K-1)*alternate_interval + K*period*(block_num-1)`
    pub fn term_time(&self) -> i64 {
        self.term_interval
            + (self.proposer_num - 1) * self.alternate_interval
            + self.proposer_num * self.period * (self.block_num - 1)
    }

    /// `pos_time = alternate_interval + period*(block_num-1)`
    pub fn pos_time(&self) -> i64 {
        self.alternate_interval + self.period * (self.block_num - 1)
    }
}
