//! Merkle proof verification against a counterparty commitment root.
//!
//! Proofs are ICS-23 commitment proofs chained over the Cosmos SDK proof
//! specs (IAVL store tree under the multistore). Callers pass a path relative
//! to the counterparty's commitment prefix; the verifier composes the
//! absolute path.

#![deny(clippy::nursery, clippy::pedantic)]
#![warn(missing_docs)]

pub mod cost;
pub mod error;
pub mod verifier;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use cost::ProofCost;
pub use error::CommitmentError;
pub use verifier::MerkleVerifier;
