//! Consensus state snapshot.

use cosmwasm_std::Binary;
use serde::{Deserialize, Serialize};

/// A committed root and the counterparty timestamp at which it was produced.
///
/// One consensus state exists per `(client, height)` and it is never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusState {
    /// Unix timestamp in nanoseconds
    pub timestamp: u64,
    /// Commitment root of the counterparty state tree
    pub root: Binary,
}

impl ConsensusState {
    /// Creates a new consensus state.
    #[must_use]
    pub fn new(timestamp: u64, root: impl Into<Binary>) -> Self {
        Self {
            timestamp,
            root: root.into(),
        }
    }

    /// Returns the reason the consensus state is unusable, if any.
    #[must_use]
    pub fn invalid_reason(&self) -> Option<&'static str> {
        if self.root.is_empty() {
            Some("commitment root cannot be empty")
        } else if self.timestamp == 0 {
            Some("timestamp cannot be zero")
        } else {
            None
        }
    }
}
