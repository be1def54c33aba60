//! Checks on the writes verification code asks the host to commit
//!
//! Code writes to its client's store directly, so the host re-establishes
//! the store invariants before anything reaches durable state: consensus
//! history stays append-only and increasing, the client state stays
//! decodable, and a frozen client stays frozen.

use std::collections::BTreeSet;

use cosmwasm_std::Storage;
use ibc_client_host_types::{storage::StagedWrites, Height};

use crate::{
    codec::{decode_client_state, decode_consensus_state},
    consensus_store,
    error::ClientError,
    keys,
};

/// Verifies `writes` made on behalf of `client_id` against `store` and
/// commits them, indexing every new consensus state.
///
/// `reported` are the heights the code claims to have updated; each must
/// have a consensus state once the writes are applied. Nothing is written
/// unless every check passes. Returns the new consensus state heights in
/// ascending order.
///
/// # Errors
/// Fails with [`ClientError::WriteRejected`] on the first write that breaks
/// a store invariant.
pub fn commit_guarded(
    store: &mut dyn Storage,
    client_id: &str,
    writes: StagedWrites,
    reported: &[Height],
) -> Result<Vec<Height>, ClientError> {
    let new_heights = check(store, client_id, &writes)?;

    for &height in reported {
        let key = keys::consensus_state(client_id, height);
        let stored = match writes.get(&key) {
            Some(staged) => staged.is_some(),
            None => store.get(&key).is_some(),
        };
        if !stored {
            return Err(rejected(client_id, &key, "reported height has no consensus state"));
        }
    }

    writes.commit(store);
    for &height in &new_heights {
        consensus_store::index(store, client_id, height);
    }
    Ok(new_heights.into_iter().collect())
}

fn check(store: &dyn Storage, client_id: &str, writes: &StagedWrites) -> Result<BTreeSet<Height>, ClientError> {
    let client_prefix = keys::client_prefix(client_id);
    let client_state_key = keys::client_state(client_id);
    let consensus_prefix = keys::consensus_states_prefix(client_id);
    let index_prefix = keys::iterate_consensus_states_prefix(client_id);
    let latest = consensus_store::latest_height(store, client_id)?;

    let mut new_heights = BTreeSet::new();
    for (key, value) in writes.iter() {
        if !key.starts_with(&client_prefix) {
            return Err(rejected(client_id, key, "outside the client store"));
        }
        if key.starts_with(&index_prefix) {
            return Err(rejected(client_id, key, "the consensus state index is maintained by the host"));
        }
        if key == client_state_key.as_slice() {
            check_client_state(store, client_id, key, value)?;
        } else if let Some(height) = key.strip_prefix(consensus_prefix.as_slice()) {
            if let Some(height) = check_consensus_state(store, client_id, key, height, value, latest)? {
                new_heights.insert(height);
            }
        }
    }
    Ok(new_heights)
}

fn check_client_state(
    store: &dyn Storage,
    client_id: &str,
    key: &[u8],
    value: Option<&[u8]>,
) -> Result<(), ClientError> {
    let Some(value) = value else {
        return Err(rejected(client_id, key, "client state cannot be deleted"));
    };
    let updated = decode_client_state(key, value)
        .map_err(|err| rejected(client_id, key, format!("undecodable client state: {err}")))?;

    let Some(current) = store.get(key) else {
        return Ok(());
    };
    let current = decode_client_state(key, &current)?;
    if updated.client_type() != current.client_type() {
        return Err(rejected(client_id, key, "client type cannot change"));
    }
    if current.is_frozen() && updated.frozen_height != current.frozen_height {
        return Err(rejected(client_id, key, "frozen height cannot be cleared"));
    }
    Ok(())
}

fn check_consensus_state(
    store: &dyn Storage,
    client_id: &str,
    key: &[u8],
    height: &[u8],
    value: Option<&[u8]>,
    latest: Option<Height>,
) -> Result<Option<Height>, ClientError> {
    let height: Height = std::str::from_utf8(height)
        .ok()
        .and_then(|height| height.parse().ok())
        .ok_or_else(|| rejected(client_id, key, "malformed consensus state key"))?;
    let Some(value) = value else {
        return Err(rejected(client_id, key, "consensus states cannot be deleted"));
    };
    decode_consensus_state(key, value)
        .map_err(|err| rejected(client_id, key, format!("undecodable consensus state: {err}")))?;

    if let Some(current) = store.get(key) {
        if current != value {
            return Err(rejected(client_id, key, "consensus states cannot be overwritten"));
        }
        return Ok(None);
    }
    if height.is_zero() || latest.is_some_and(|latest| height <= latest) {
        return Err(rejected(
            client_id,
            key,
            "consensus state height must exceed the latest stored height",
        ));
    }
    Ok(Some(height))
}

fn rejected(client_id: &str, key: &[u8], reason: impl ToString) -> ClientError {
    ClientError::WriteRejected {
        client_id: client_id.to_string(),
        key: String::from_utf8_lossy(key).into_owned(),
        reason: reason.to_string(),
    }
}
