use crate::common::get_current_time_or_zero;
use log::info;
use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::Rng;

const NODE_ID_BITS: u64 = 10;
const SEQUENCE_BITS: u64 = 12;
const EPOCH: u64 = 1288834974657;

struct GeneratorState {
    sequence: u64,
    last_timestamp: u64,
}

/// Time-ordered 64-bit id source: milliseconds since a fixed epoch, a random
/// node id and a per-millisecond sequence.
pub struct SnowflakeIdGenerator {
    node_id: u64,
    sequence_mask: u64,
    timestamp_left_shift: u64,
    state: Mutex<GeneratorState>,
}

impl SnowflakeIdGenerator {
    pub fn new() -> Self {
        let max_node_id = (1u64 << NODE_ID_BITS) - 1;
        let node_id = OsRng.gen_range(0..=max_node_id);
        info!("Initialized id generator with node id: {}", node_id);

        SnowflakeIdGenerator {
            node_id,
            sequence_mask: (1u64 << SEQUENCE_BITS) - 1,
            timestamp_left_shift: SEQUENCE_BITS + NODE_ID_BITS,
            state: Mutex::new(GeneratorState {
                sequence: 0,
                last_timestamp: 0,
            }),
        }
    }

    pub fn get_id(&self) -> u64 {
        let mut state = self.state.lock();

        // a clock that moved backwards keeps issuing from the last timestamp
        let mut timestamp = (get_current_time_or_zero() as u64).max(state.last_timestamp);
        if timestamp == state.last_timestamp {
            state.sequence = (state.sequence + 1) & self.sequence_mask;
            if state.sequence == 0 {
                timestamp = next_millis(state.last_timestamp);
            }
        } else {
            state.sequence = 0;
        }
        state.last_timestamp = timestamp;
        self.compose(timestamp, state.sequence)
    }

    // a clock reading before the epoch (or a failed read) clamps to it
    fn compose(&self, timestamp: u64, sequence: u64) -> u64 {
        (timestamp.saturating_sub(EPOCH) << self.timestamp_left_shift)
            | (self.node_id << SEQUENCE_BITS)
            | sequence
    }
}

impl Default for SnowflakeIdGenerator {
    fn default() -> Self {
        SnowflakeIdGenerator::new()
    }
}

fn next_millis(last_timestamp: u64) -> u64 {
    loop {
        let now = get_current_time_or_zero() as u64;
        if now > last_timestamp {
            return now;
        }
        if now < last_timestamp {
            return last_timestamp + 1;
        }
        std::thread::yield_now();
    }
}
