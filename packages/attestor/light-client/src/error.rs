//! Error types for attestor light client

use ibc_client_host_types::ErrorKind;
use thiserror::Error;

/// Main error type for attestor IBC operations
#[derive(Error, Debug)]
pub enum IbcAttestorClientError {
    /// Invalid signature verification
    #[error("Signature verification failed")]
    InvalidSignature,

    /// Public key cannot be decoded
    #[error("Invalid public key {pubkey}")]
    InvalidPublicKey {
        /// Hex encoded key
        pubkey: String,
    },

    /// Invalid header format
    #[error("Invalid header format: {reason}")]
    InvalidHeader {
        /// Reason for error
        reason: String,
    },

    /// Misbehaviour evidence is malformed or not conflicting
    #[error("Invalid misbehaviour: {reason}")]
    InvalidMisbehaviour {
        /// Reason for error
        reason: String,
    },

    /// Unregistered public key
    #[error("Unknown public key submitted {pubkey}")]
    UnknownPublicKeySubmitted {
        /// Hex encoded key
        pubkey: String,
    },

    /// Cannot attest to data as malformed
    #[error("Invalid attested data: {reason}")]
    InvalidAttestedData {
        /// Reason for error
        reason: String,
    },

    /// Client parameters are unusable
    #[error("Invalid attestor parameters: {reason}")]
    InvalidParams {
        /// Reason for error
        reason: String,
    },

    /// Client message cannot be deserialized
    #[error("deserializing client message failed: {0}")]
    DeserializeClientMessageFailed(#[source] serde_json::Error),
}

impl IbcAttestorClientError {
    /// Classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSignature
            | Self::UnknownPublicKeySubmitted { .. }
            | Self::InvalidAttestedData { .. } => ErrorKind::Unauthenticated,
            Self::InvalidPublicKey { .. }
            | Self::InvalidHeader { .. }
            | Self::InvalidMisbehaviour { .. }
            | Self::InvalidParams { .. }
            | Self::DeserializeClientMessageFailed(_) => ErrorKind::InvalidArgument,
        }
    }
}
