//! Host environment observed by light client operations.

use cosmwasm_std::Timestamp;
use serde::{Deserialize, Serialize};

/// The host chain's current block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEnv {
    /// Host chain identifier
    pub chain_id: String,
    /// Current block height
    pub block_height: u64,
    /// Current block time
    pub block_time: Timestamp,
}

impl HostEnv {
    /// Creates an environment at the given height and unix time in seconds.
    #[must_use]
    pub fn new(chain_id: impl Into<String>, block_height: u64, unix_seconds: u64) -> Self {
        Self {
            chain_id: chain_id.into(),
            block_height,
            block_time: Timestamp::from_seconds(unix_seconds),
        }
    }

    /// Current time as unix nanoseconds.
    #[must_use]
    pub fn now_nanos(&self) -> u64 {
        self.block_time.nanos()
    }

    /// The same environment advanced by `blocks` blocks and `seconds` seconds.
    #[must_use]
    pub fn advanced_by(&self, blocks: u64, seconds: u64) -> Self {
        Self {
            chain_id: self.chain_id.clone(),
            block_height: self.block_height.saturating_add(blocks),
            block_time: self.block_time.plus_seconds(seconds),
        }
    }
}
