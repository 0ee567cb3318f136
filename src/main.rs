use std::collections::HashMap;
use std::sync::Mutex;

use clap::{Parser, ValueEnum};
use tdpos_scheduler::{Address, Block, BlockId, Ledger, ScheduleConfig, Schedule, SnapshotReader, VersionedRecord};

/// TDPoS scheduler demo CLI.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "TDPoS proposer-election scheduler demo")]
pub struct DemoArgs {
    /// Which canned scenario to run.
    #[arg(long, value_enum, default_value_t = Scenario::Rotation)]
    pub scenario: Scenario,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Scenario {
    /// Bootstrap window: `get_validators` before any ballot has resolved.
    Bootstrap,
    /// A ballot change committed mid-chain, observed through `update_proposers`.
    Rotation,
}

type StateMap = HashMap<(String, Vec<u8>), Vec<u8>>;

struct DemoLedger {
    blocks: Mutex<Vec<Block>>,
    states: Mutex<Vec<StateMap>>,
}

impl DemoLedger {
    fn new() -> Self {
        Self {
            blocks: Mutex::new(vec![Block::new(0, vec![0], Address::from("genesis"))]),
            states: Mutex::new(vec![HashMap::new()]),
        }
    }

    fn push(&self, proposer: &str, updates: Vec<(&str, String, Vec<u8>)>) -> i64 {
        let mut blocks = self.blocks.lock().unwrap();
        let mut states = self.states.lock().unwrap();
        let height = blocks.last().unwrap().height() + 1;
        blocks.push(Block::new(height, (height as u64).to_be_bytes().to_vec(), Address::from(proposer)));
        let mut state = states.last().unwrap().clone();
        for (bucket, key, value) in updates {
            state.insert((bucket.to_string(), key.into_bytes()), value);
        }
        states.push(state);
        height
    }
}

struct DemoSnapshotReader {
    state: StateMap,
}

impl SnapshotReader for DemoSnapshotReader {
    fn get(&self, bucket: &str, key: &[u8]) -> Option<VersionedRecord> {
        self.state.get(&(bucket.to_string(), key.to_vec())).map(|v| VersionedRecord { value: v.clone() })
    }
}

impl Ledger for DemoLedger {
    fn tip_block(&self) -> Block {
        self.blocks.lock().unwrap().last().unwrap().clone()
    }

    fn block_by_height(&self, height: i64) -> Option<Block> {
        if height < 0 {
            return None;
        }
        self.blocks.lock().unwrap().get(height as usize).cloned()
    }

    fn create_snapshot(&self, block_id: &BlockId) -> Option<Box<dyn SnapshotReader>> {
        let blocks = self.blocks.lock().unwrap();
        let idx = blocks.iter().position(|b| b.block_id() == block_id)?;
        Some(Box::new(DemoSnapshotReader { state: self.states.lock().unwrap()[idx].clone() }))
    }
}

fn nominate_and_votes(candidates: &[(&str, i64)]) -> Vec<(&'static str, String, Vec<u8>)> {
    let mut nominate = serde_json::Map::new();
    let mut updates = Vec::new();
    for (addr, ballots) in candidates {
        nominate.insert(addr.to_string(), serde_json::json!({}));
        let votes: HashMap<&str, i64> = [("demo-voter", *ballots)].into_iter().collect();
        updates.push(("tdpos", format!("vote_{addr}"), serde_json::to_vec(&votes).unwrap()));
    }
    updates.push(("tdpos", "nominate".to_string(), serde_json::to_vec(&nominate).unwrap()));
    updates
}

fn config() -> ScheduleConfig {
    ScheduleConfig::new(3000, 10, 2, 1000, 60000, 0, true).expect("demo config is valid")
}

fn run_bootstrap() {
    let ledger = DemoLedger::new();
    let schedule = Schedule::new(
        config(),
        std::sync::Arc::new(ledger),
        Address::from("node-self"),
        vec![Address::from("alice"), Address::from("bob")],
    );

    println!("bootstrap window (round <= 3): no ballots have resolved yet");
    for round in 1..=3 {
        println!("  round {round}: validators = {:?}", schedule.get_validators(round).unwrap());
    }
}

fn run_rotation() {
    let ledger = DemoLedger::new();
    ledger.push("alice", nominate_and_votes(&[("alice", 10), ("bob", 5)]));
    for _ in 0..5 {
        ledger.push("alice", Vec::new());
    }

    let schedule = Schedule::new(
        config(),
        std::sync::Arc::new(ledger),
        Address::from("node-self"),
        vec![Address::from("alice"), Address::from("bob")],
    );

    println!("tip at height 6, ballots committed at height 1 (anchors at height 3)");
    println!("update_proposers() -> {}", schedule.update_proposers());
    println!("validators = {:?}", schedule.get_validators(7));
    for round in 1..=3 {
        println!("  round {round} leader = {:?}", schedule.get_leader(round));
    }
}

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt::init();
    let args = DemoArgs::parse();

    println!("TDPoS scheduler demo");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));

    match args.scenario {
        Scenario::Bootstrap => run_bootstrap(),
        Scenario::Rotation => run_rotation(),
    }

    Ok(())
}
