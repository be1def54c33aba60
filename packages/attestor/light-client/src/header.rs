//! Attestor header types for IBC light client

use cosmwasm_std::Binary;
use ibc_client_host_types::{ConsensusState, Height};
use serde::{Deserialize, Serialize};

use crate::{error::IbcAttestorClientError, misbehaviour::Misbehaviour};

/// A signature by one attestor over [`Header::signing_bytes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestorSignature {
    /// SEC1 encoded public key of the signer
    pub pubkey: Binary,
    /// 64-byte `r || s` ECDSA signature over the SHA-256 of the signing bytes
    pub signature: Binary,
}

/// Attested consensus state at a new height
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// The height being attested
    pub height: Height,
    /// Counterparty timestamp at that height, unix nanoseconds
    pub timestamp: u64,
    /// Commitment root at that height
    pub root: Binary,
    /// Attestor signatures
    pub signatures: Vec<AttestorSignature>,
}

impl Header {
    /// The bytes every attestor signs: big endian revision number, revision
    /// height and timestamp followed by the root.
    #[must_use]
    pub fn signing_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(24 + self.root.len());
        bytes.extend_from_slice(&self.height.to_be_bytes());
        bytes.extend_from_slice(&self.timestamp.to_be_bytes());
        bytes.extend_from_slice(&self.root);
        bytes
    }

    /// The consensus state this header attests to.
    #[must_use]
    pub fn consensus_state(&self) -> ConsensusState {
        ConsensusState::new(self.timestamp, self.root.clone())
    }
}

/// Message submitted to update an attestor client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientMessage {
    /// A new attested header
    Header(Header),
    /// Evidence of two conflicting attested headers
    Misbehaviour(Misbehaviour),
}

impl ClientMessage {
    /// Decodes a JSON client message.
    ///
    /// # Errors
    /// Returns an error if the bytes are not a JSON client message.
    pub fn decode(bytes: &[u8]) -> Result<Self, IbcAttestorClientError> {
        serde_json::from_slice(bytes).map_err(IbcAttestorClientError::DeserializeClientMessageFailed)
    }

    /// JSON encoding of the message.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        // derived serialization of plain data cannot fail
        serde_json::to_vec(self).unwrap_or_default()
    }
}
