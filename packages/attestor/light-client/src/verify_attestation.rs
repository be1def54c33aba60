//! Generic function and data structures for verifying
//! attested data.

use std::collections::HashSet;

use k256::ecdsa::{signature::Verifier, Signature, VerifyingKey};

use crate::{client_state::AttestorParams, error::IbcAttestorClientError, header::AttestorSignature};

/// Verifies the cryptographic validity of the attestation data.
///
/// Fails if:
/// - Signers are not unique
/// - Too few signatures are submitted
/// - A signer is not a registered attestor
/// - A signature does not verify over `attestation_data`
#[allow(clippy::module_name_repetitions)]
pub fn verify_attestation(
    params: &AttestorParams,
    attestation_data: &[u8],
    signatures: &[AttestorSignature],
) -> Result<(), IbcAttestorClientError> {
    let unique_signers: HashSet<&[u8]> = signatures.iter().map(|s| s.pubkey.as_slice()).collect();
    if unique_signers.len() != signatures.len() {
        return Err(IbcAttestorClientError::InvalidAttestedData {
            reason: "duplicate signers provided".into(),
        });
    }
    if unique_signers.len() < usize::from(params.min_required_sigs) {
        return Err(IbcAttestorClientError::InvalidAttestedData {
            reason: format!(
                "too few signatures provided: {} of {} required",
                unique_signers.len(),
                params.min_required_sigs
            ),
        });
    }

    for att in signatures {
        if !params.attestor_keys.contains(&att.pubkey) {
            return Err(IbcAttestorClientError::UnknownPublicKeySubmitted {
                pubkey: hex::encode(&att.pubkey),
            });
        }
        let key = VerifyingKey::from_sec1_bytes(&att.pubkey).map_err(|_| {
            IbcAttestorClientError::InvalidPublicKey {
                pubkey: hex::encode(&att.pubkey),
            }
        })?;
        let signature = Signature::from_slice(&att.signature)
            .map_err(|_| IbcAttestorClientError::InvalidSignature)?;
        key.verify(attestation_data, &signature)
            .map_err(|_| IbcAttestorClientError::InvalidSignature)?;
    }

    Ok(())
}
