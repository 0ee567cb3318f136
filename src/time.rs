//! The Time Scheduler (§4.4): a pure function from wall-clock instant to
//! `(term, pos, block_pos)`. No I/O, no logging, no mutable state — its
//! output must be reproducible byte-for-byte across nodes.

use crate::config::ScheduleConfig;

/// One rotation slot: the term number (1-indexed), the in-term validator
/// index (0-indexed, a `proposers` index), and the 1-indexed block number
/// within that validator's slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// 1-indexed term number.
    pub term: i64,
    /// 0-indexed validator slot within the term.
    pub pos: i64,
    /// 1-indexed block number within the validator's slot.
    pub block_pos: i64,
}

/// Map a timestamp `t` (same units as `config.init_timestamp`) to the slot
/// active at that instant.
///
/// Returns `Slot { term: 0, pos: 0, block_pos: 0 }` for any `t` strictly
/// before `init_timestamp` — time arithmetic never produces a negative slot.
pub fn schedule(config: &ScheduleConfig, t: i64) -> Slot {
    if t < config.init_timestamp {
        return Slot { term: 0, pos: 0, block_pos: 0 };
    }

    let term_time = config.term_time();
    let pos_time = config.pos_time();

    let delta = t - config.init_timestamp;
    let term = delta / term_time + 1;
    let rem1 = delta - (term - 1) * term_time;
    let pos = rem1 / pos_time;
    let rem2 = rem1 - pos * pos_time;
    let block_pos = rem2 / config.period + 1;

    Slot { term, pos, block_pos }
}
