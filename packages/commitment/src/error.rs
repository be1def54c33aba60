//! Error types for proof verification

use ibc_client_host_types::ErrorKind;
use thiserror::Error;

/// Errors raised by [`crate::MerkleVerifier`].
#[derive(Debug, Error)]
pub enum CommitmentError {
    /// No proof bytes were supplied
    #[error("empty proof")]
    EmptyProof,

    /// The proof height is the zero sentinel
    #[error("proof height must be non-zero")]
    ZeroProofHeight,

    /// The merkle path has no segments
    #[error("empty merkle path")]
    EmptyMerklePath,

    /// Membership was requested for an empty value
    #[error("empty value")]
    EmptyValue,

    /// The commitment root to verify against is empty
    #[error("empty commitment root")]
    EmptyRoot,

    /// The proof bytes are not a protobuf merkle proof
    #[error("failed to decode merkle proof: {0}")]
    DecodeProof(#[source] prost::DecodeError),

    /// The proof does not verify against the root
    #[error("{kind} verification failed: {reason}")]
    VerificationFailed {
        /// `membership` or `non-membership`
        kind: &'static str,
        /// Reason reported by the commitment library
        reason: String,
    },
}

impl CommitmentError {
    /// Classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyProof
            | Self::ZeroProofHeight
            | Self::EmptyMerklePath
            | Self::EmptyValue
            | Self::EmptyRoot
            | Self::DecodeProof(_) => ErrorKind::InvalidArgument,
            Self::VerificationFailed { .. } => ErrorKind::Unauthenticated,
        }
    }
}
