//! Gas pricing of proof verification.

use serde::{Deserialize, Serialize};

/// Gas charged for verifying a proof, growing with proof size and path depth.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProofCost {
    /// Charged once per verification
    pub verify_flat: u64,
    /// Charged per proof byte
    pub proof_byte: u64,
    /// Charged per path segment, including the commitment prefix
    pub path_segment: u64,
}

impl Default for ProofCost {
    fn default() -> Self {
        Self {
            verify_flat: 1_000,
            proof_byte: 3,
            path_segment: 30,
        }
    }
}

impl ProofCost {
    /// Gas for a proof of `proof_len` bytes over a path of `segments` segments.
    #[must_use]
    pub fn of(&self, proof_len: usize, segments: usize) -> u64 {
        let proof_len = u64::try_from(proof_len).unwrap_or(u64::MAX);
        let segments = u64::try_from(segments).unwrap_or(u64::MAX);
        self.verify_flat
            .saturating_add(self.proof_byte.saturating_mul(proof_len))
            .saturating_add(self.path_segment.saturating_mul(segments))
    }
}

#[cfg(test)]
mod tests {
    use super::ProofCost;

    #[test]
    fn grows_with_size_and_depth() {
        let cost = ProofCost::default();
        assert_eq!(cost.of(0, 0), 1_000);
        assert_eq!(cost.of(100, 2), 1_000 + 300 + 60);
        assert!(cost.of(101, 2) > cost.of(100, 2));
        assert!(cost.of(100, 3) > cost.of(100, 2));
        assert_eq!(cost.of(usize::MAX, usize::MAX), u64::MAX);
    }
}
