//! Test utilities for Attestor light client

#[cfg(any(test, feature = "test-utils"))]
pub use fixtures::*;

#[allow(missing_docs, clippy::missing_panics_doc)]
#[cfg(any(test, feature = "test-utils"))]
mod fixtures {
    use cosmwasm_std::Binary;
    use ibc_client_host_types::Height;
    use k256::ecdsa::{signature::Signer, Signature, SigningKey, VerifyingKey};

    use crate::{
        client_state::AttestorParams,
        header::{AttestorSignature, ClientMessage, Header},
    };

    /// 2024-01-01T00:00:00Z in unix nanoseconds
    pub const NOW: u64 = 1_704_067_200_000_000_000;

    #[must_use]
    pub fn signing_keys() -> Vec<SigningKey> {
        [[0xcd; 32], [0x02; 32], [0x03; 32], [0x10; 32], [0x1F; 32]]
            .iter()
            .map(|secret| SigningKey::from_bytes(&(*secret).into()).expect("valid key"))
            .collect()
    }

    #[must_use]
    pub fn verifying_keys() -> Vec<VerifyingKey> {
        signing_keys().iter().map(|k| k.verifying_key().clone()).collect()
    }

    /// All five fixture attestors with the given threshold
    #[must_use]
    pub fn attestor_params(min_required_sigs: u8) -> AttestorParams {
        AttestorParams::new_from_pubkeys(&verifying_keys(), min_required_sigs)
    }

    #[must_use]
    pub fn sign(data: &[u8], signers: &[SigningKey]) -> Vec<AttestorSignature> {
        signers
            .iter()
            .map(|key| {
                let signature: Signature = key.sign(data);
                AttestorSignature {
                    pubkey: Binary::from(key.verifying_key().to_encoded_point(true).as_bytes()),
                    signature: Binary::from(signature.to_bytes().as_slice()),
                }
            })
            .collect()
    }

    #[must_use]
    pub fn signed_header(
        height: Height,
        timestamp: u64,
        root: &[u8],
        signers: &[SigningKey],
    ) -> Header {
        let mut header = Header {
            height,
            timestamp,
            root: Binary::from(root),
            signatures: vec![],
        };
        header.signatures = sign(&header.signing_bytes(), signers);
        header
    }

    /// JSON header update message signed by the first `signers` fixture keys
    #[must_use]
    pub fn header_message(height: Height, timestamp: u64, root: &[u8], signers: usize) -> Vec<u8> {
        ClientMessage::Header(signed_header(height, timestamp, root, &signing_keys()[..signers]))
            .encode()
    }
}
