//! Attestor parameters carried by an attestor client state

use cosmwasm_std::Binary;
use k256::ecdsa::VerifyingKey;
use serde::{Deserialize, Serialize};

use crate::error::IbcAttestorClientError;

/// The attestor set trusted by a client.
///
/// These are identity fields: they survive client upgrades unchanged and
/// are part of what an upgrade proof attests to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestorParams {
    /// SEC1 encoded secp256k1 public keys of the attestors
    pub attestor_keys: Vec<Binary>,
    /// Minimum number of distinct attestor signatures on a header
    pub min_required_sigs: u8,
}

impl AttestorParams {
    /// Construct the parameters from a list of public keys.
    #[must_use]
    pub fn new_from_pubkeys(pub_keys: &[VerifyingKey], min_required_sigs: u8) -> Self {
        let attestor_keys = pub_keys
            .iter()
            .map(|pk| Binary::from(pk.to_encoded_point(true).as_bytes()))
            .collect();

        Self {
            attestor_keys,
            min_required_sigs,
        }
    }

    /// Checks that the threshold is reachable and every key parses.
    ///
    /// # Errors
    /// Returns an error on a zero or unreachable threshold, a duplicate key, or
    /// a key that is not a valid SEC1 point.
    pub fn validate(&self) -> Result<(), IbcAttestorClientError> {
        if self.min_required_sigs == 0 {
            return Err(IbcAttestorClientError::InvalidParams {
                reason: "min_required_sigs must be at least 1".into(),
            });
        }
        if usize::from(self.min_required_sigs) > self.attestor_keys.len() {
            return Err(IbcAttestorClientError::InvalidParams {
                reason: format!(
                    "min_required_sigs {} exceeds the {} registered attestors",
                    self.min_required_sigs,
                    self.attestor_keys.len()
                ),
            });
        }
        for (i, key) in self.attestor_keys.iter().enumerate() {
            if self.attestor_keys[..i].contains(key) {
                return Err(IbcAttestorClientError::InvalidParams {
                    reason: format!("duplicate attestor key {}", hex::encode(key)),
                });
            }
            VerifyingKey::from_sec1_bytes(key).map_err(|_| IbcAttestorClientError::InvalidPublicKey {
                pubkey: hex::encode(key),
            })?;
        }
        Ok(())
    }
}
