//! Attestor light client verification logic

use crate::{
    client_state::AttestorParams, error::IbcAttestorClientError, header::Header,
    verify_attestation,
};

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Verifies the header of the light client
///
/// Only the header itself is checked here. Whether it conflicts with stored
/// consensus states is decided by [`crate::misbehaviour::check_for_misbehaviour`].
///
/// # Errors
/// Returns an error if:
/// - The header height is zero, the root is empty or the timestamp is zero
/// - The header timestamp is beyond `now + max_clock_drift`
/// - The header attestation verification fails. see [`verify_attestation::verify_attestation`]
pub fn verify_header(
    params: &AttestorParams,
    header: &Header,
    now_nanos: u64,
    max_clock_drift_secs: u64,
) -> Result<(), IbcAttestorClientError> {
    if header.height.is_zero() {
        return Err(IbcAttestorClientError::InvalidHeader {
            reason: "height cannot be zero".into(),
        });
    }
    if header.root.is_empty() {
        return Err(IbcAttestorClientError::InvalidHeader {
            reason: "commitment root cannot be empty".into(),
        });
    }
    if header.timestamp == 0 {
        return Err(IbcAttestorClientError::InvalidHeader {
            reason: "timestamp cannot be zero".into(),
        });
    }

    let drift = max_clock_drift_secs.saturating_mul(NANOS_PER_SECOND);
    if header.timestamp > now_nanos.saturating_add(drift) {
        return Err(IbcAttestorClientError::InvalidHeader {
            reason: format!(
                "timestamp {} is beyond the allowed clock drift from {now_nanos}",
                header.timestamp
            ),
        });
    }

    verify_attestation::verify_attestation(params, &header.signing_bytes(), &header.signatures)
}
