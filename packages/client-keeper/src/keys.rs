//! Host store keys

use ibc_client_host_types::Height;

/// Key of the global client sequence counter.
pub const NEXT_CLIENT_SEQUENCE: &[u8] = b"nextClientSequence";
/// Prefix of every client's store.
pub const CLIENTS_PREFIX: &[u8] = b"clients/";
/// Key of the pending upgrade plan.
pub const UPGRADE_PLAN: &[u8] = b"upgrade/plan";

/// Last key segment of a client state.
pub const CLIENT_STATE_KEY: &str = "clientState";
/// Segment under which consensus states are stored.
pub const CONSENSUS_STATES_SEGMENT: &str = "consensusStates";
/// Segment under which the height ordered consensus state index lives.
pub const ITERATE_CONSENSUS_STATES_SEGMENT: &str = "iterateConsensusStates";

/// `clients/{client_id}/`
#[must_use]
pub fn client_prefix(client_id: &str) -> Vec<u8> {
    format!("clients/{client_id}/").into_bytes()
}

/// `clients/{client_id}/clientState`
#[must_use]
pub fn client_state(client_id: &str) -> Vec<u8> {
    format!("clients/{client_id}/{CLIENT_STATE_KEY}").into_bytes()
}

/// `clients/{client_id}/consensusStates/`
#[must_use]
pub fn consensus_states_prefix(client_id: &str) -> Vec<u8> {
    format!("clients/{client_id}/{CONSENSUS_STATES_SEGMENT}/").into_bytes()
}

/// `clients/{client_id}/consensusStates/{revision_number}-{revision_height}`
#[must_use]
pub fn consensus_state(client_id: &str, height: Height) -> Vec<u8> {
    format!("clients/{client_id}/{CONSENSUS_STATES_SEGMENT}/{height}").into_bytes()
}

/// `clients/{client_id}/iterateConsensusStates/`
#[must_use]
pub fn iterate_consensus_states_prefix(client_id: &str) -> Vec<u8> {
    format!("clients/{client_id}/{ITERATE_CONSENSUS_STATES_SEGMENT}/").into_bytes()
}

/// `clients/{client_id}/iterateConsensusStates/{big endian height}`, so that
/// byte order is height order.
#[must_use]
pub fn iterate_consensus_state(client_id: &str, height: Height) -> Vec<u8> {
    let mut key = iterate_consensus_states_prefix(client_id);
    key.extend_from_slice(&height.to_be_bytes());
    key
}

/// `upgradedIBCState/{height}/upgradedClient`
#[must_use]
pub fn upgraded_client_state(height: u64) -> Vec<u8> {
    format!("upgradedIBCState/{height}/upgradedClient").into_bytes()
}

/// `upgradedIBCState/{height}/upgradedConsState`
#[must_use]
pub fn upgraded_consensus_state(height: u64) -> Vec<u8> {
    format!("upgradedIBCState/{height}/upgradedConsState").into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_keys_sort_by_height() {
        let keys: Vec<Vec<u8>> = [Height::new(1, 0), Height::new(0, 256), Height::new(0, 9)]
            .into_iter()
            .map(|height| iterate_consensus_state("attestor-0", height))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(sorted, vec![keys[2].clone(), keys[1].clone(), keys[0].clone()]);
    }

    #[test]
    fn consensus_key_uses_height_display() {
        assert_eq!(
            consensus_state("attestor-0", Height::new(2, 15)),
            b"clients/attestor-0/consensusStates/2-15"
        );
    }
}
