//! The Ballot Aggregator (§4.2): turns nominate+vote contract records into a
//! deterministic top-K proposer list, and feeds the result into the History
//! Cache.

use crate::address::Address;
use crate::config::{ScheduleConfig, NOMINATE_KEY, VOTE_KEY_PREFIX};
use crate::contract::{self, NominateRecord, VoteRecord};
use crate::error::ScheduleError;
use crate::history::HistoryCache;
use crate::ledger::Ledger;
use crate::snapshot;

/// Compute the top-`proposer_num` proposer list for `height`, reading
/// contract state anchored at `height - 3`, and record the result in
/// `history`.
///
/// Deterministic across nodes: candidates are processed in ascending
/// address order before the descending-ballots stable sort, so that ties in
/// ballot count break on ascending address regardless of map iteration
/// order (§4.2 step 5).
pub fn calculate_proposers(
    config: &ScheduleConfig,
    ledger: &dyn Ledger,
    history: &HistoryCache,
    height: i64,
) -> Result<Vec<Address>, ScheduleError> {
    let bucket = config.contract_bucket.as_str();

    let nominate_raw = snapshot::read_at_height(ledger, height, bucket, NOMINATE_KEY.as_bytes())?;
    let nominate: NominateRecord = contract::decode(bucket, NOMINATE_KEY.as_bytes(), &nominate_raw)?;

    let mut candidates: Vec<String> = nominate.into_keys().collect();
    candidates.sort();

    let mut tallies: Vec<(Address, i64)> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let vote_key = format!("{VOTE_KEY_PREFIX}{candidate}");
        let vote_raw = snapshot::read_at_height(ledger, height, bucket, vote_key.as_bytes())?;
        let votes: VoteRecord = contract::decode(bucket, vote_key.as_bytes(), &vote_raw)?;
        let ballots: i64 = votes.values().sum();
        tallies.push((Address::from(candidate.as_str()), ballots));
    }

    if (tallies.len() as i64) < config.proposer_num {
        tracing::error!(
            found = tallies.len(),
            required = config.proposer_num,
            "tdpos::calculate_proposers insufficient candidates"
        );
        return Err(ScheduleError::InsufficientProposers {
            found: tallies.len(),
            required: config.proposer_num as usize,
        });
    }

    // Stable sort: ties keep the ascending-address order established above.
    tallies.sort_by(|a, b| b.1.cmp(&a.1));

    let proposers: Vec<Address> =
        tallies.into_iter().take(config.proposer_num as usize).map(|(addr, _)| addr).collect();

    history.insert(height, proposers.clone());
    tracing::debug!(height, count = proposers.len(), "tdpos::calculate_proposers computed");

    Ok(proposers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeLedger;

    fn json(candidates: &[(&str, &[(&str, i64)])]) -> (Vec<u8>, Vec<(String, Vec<u8>, Vec<u8>)>) {
        let mut nominate = serde_json::Map::new();
        let mut updates = Vec::new();
        for (addr, votes) in candidates {
            nominate.insert(addr.to_string(), serde_json::json!({}));
            let vote_map: std::collections::HashMap<&str, i64> = votes.iter().cloned().collect();
            let vote_raw = serde_json::to_vec(&vote_map).unwrap();
            let vote_key = format!("{VOTE_KEY_PREFIX}{addr}");
            updates.push((vote_key.clone(), vote_key.into_bytes(), vote_raw));
        }
        let nominate_raw = serde_json::to_vec(&nominate).unwrap();
        (nominate_raw, updates)
    }

    fn seed(ledger: &FakeLedger, candidates: &[(&str, &[(&str, i64)])]) -> i64 {
        let (nominate_raw, vote_updates) = json(candidates);
        let mut updates = vec![("tdpos", NOMINATE_KEY.as_bytes().to_vec(), nominate_raw)];
        for (_, key, raw) in &vote_updates {
            updates.push(("tdpos", key.clone(), raw.clone()));
        }
        ledger.push_block_with_state(Vec::<u8>::new(), updates)
    }

    fn cfg(k: i64) -> ScheduleConfig {
        ScheduleConfig::new(3000, 10, k, 1000, 60000, 0, true).unwrap()
    }

    #[test]
    fn s4_top_k_tie_breaks_on_ascending_address() {
        let ledger = FakeLedger::new();
        let commit_height = seed(
            &ledger,
            &[("dave", &[("x", 10)]), ("alice", &[("y", 10)]), ("bob", &[("z", 5)]), ("carl", &[("w", 5)])],
        );
        let history = HistoryCache::new();
        let query_height = commit_height + 3;

        let proposers = calculate_proposers(&cfg(2), &ledger, &history, query_height).unwrap();

        assert_eq!(proposers, vec![Address::from("alice"), Address::from("dave")]);
    }

    #[test]
    fn insufficient_candidates_fails() {
        let ledger = FakeLedger::new();
        let commit_height = seed(&ledger, &[("alice", &[("y", 1)])]);
        let history = HistoryCache::new();

        let err =
            calculate_proposers(&cfg(2), &ledger, &history, commit_height + 3).unwrap_err();
        assert!(matches!(err, ScheduleError::InsufficientProposers { found: 1, required: 2 }));
    }

    #[test]
    fn calculate_proposers_populates_history() {
        let ledger = FakeLedger::new();
        let commit_height =
            seed(&ledger, &[("alice", &[("y", 10)]), ("bob", &[("z", 5)])]);
        let history = HistoryCache::new();
        let query_height = commit_height + 3;

        calculate_proposers(&cfg(2), &ledger, &history, query_height).unwrap();
        assert_eq!(history.lookup(query_height), Some(vec![Address::from("alice"), Address::from("bob")]));
    }
}
