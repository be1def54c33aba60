//! Misbehaviour detection

use ibc_client_host_types::{ConsensusState, Height};
use serde::{Deserialize, Serialize};

use crate::{
    client_state::AttestorParams, error::IbcAttestorClientError, header::Header,
    verify::verify_header,
};

/// Two validly attested headers that cannot both be true
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Misbehaviour {
    /// The header at the greater or equal height
    pub header_1: Header,
    /// The conflicting header
    pub header_2: Header,
}

impl Misbehaviour {
    /// Height the client is frozen at when this evidence is accepted.
    #[must_use]
    pub const fn height(&self) -> Height {
        self.header_1.height
    }
}

/// Verifies misbehaviour evidence
///
/// Both headers must be validly attested and either attest different
/// consensus states at the same height, or violate timestamp monotonicity
/// across heights.
///
/// # Errors
/// Returns an error if a header is invalid or the headers do not conflict.
pub fn verify_misbehaviour(
    params: &AttestorParams,
    misbehaviour: &Misbehaviour,
    now_nanos: u64,
    max_clock_drift_secs: u64,
) -> Result<(), IbcAttestorClientError> {
    verify_header(params, &misbehaviour.header_1, now_nanos, max_clock_drift_secs)?;
    verify_header(params, &misbehaviour.header_2, now_nanos, max_clock_drift_secs)?;

    let (h1, h2) = (&misbehaviour.header_1, &misbehaviour.header_2);
    if h1.height == h2.height {
        if h1.consensus_state() == h2.consensus_state() {
            return Err(IbcAttestorClientError::InvalidMisbehaviour {
                reason: "headers at the same height attest the same consensus state".into(),
            });
        }
        return Ok(());
    }

    if h1.height < h2.height {
        return Err(IbcAttestorClientError::InvalidMisbehaviour {
            reason: "header_1 height must not be lower than header_2 height".into(),
        });
    }
    if h1.timestamp > h2.timestamp {
        return Err(IbcAttestorClientError::InvalidMisbehaviour {
            reason: "headers at different heights must violate timestamp monotonicity".into(),
        });
    }
    Ok(())
}

/// Checks a verified header against the stored consensus states around it.
///
/// `existing` is the consensus state at the header height, `prev` the closest
/// one below it and `next` the closest one above it. A header conflicts if it
/// attests a different consensus state at a stored height, or its timestamp
/// is not strictly between those of its neighbours.
#[must_use]
pub fn check_for_misbehaviour(
    existing: Option<&ConsensusState>,
    prev: Option<&ConsensusState>,
    next: Option<&ConsensusState>,
    header: &Header,
) -> bool {
    if let Some(existing) = existing {
        return existing != &header.consensus_state();
    }
    prev.is_some_and(|prev| header.timestamp <= prev.timestamp)
        || next.is_some_and(|next| header.timestamp >= next.timestamp)
}
