//! Status of natively verified clients, derived on every read

use ibc_client_host_types::{ConsensusState, Status};

use crate::client_state::ClientState;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Computes the status of `client_state` at `now_nanos`.
///
/// `latest` is the consensus state stored at the client's latest height.
/// A client expires once `trusting_period` has elapsed since that
/// consensus state's timestamp.
#[must_use]
pub fn native_status(client_state: &ClientState, latest: Option<&ConsensusState>, now_nanos: u64) -> Status {
    if client_state.is_frozen() {
        return Status::Frozen;
    }
    let Some(latest) = latest else {
        return Status::Expired;
    };

    let trusting_period = client_state.trusting_period.saturating_mul(NANOS_PER_SECOND);
    let elapsed = now_nanos.saturating_sub(latest.timestamp);
    if elapsed >= trusting_period {
        return Status::Expired;
    }
    Status::Active
}
