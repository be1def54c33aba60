//! Upgrade plan state and the counterparty paths upgrades are proven at

use cosmwasm_std::Storage;
use ibc_client_host_types::{ensure, ConsensusState, Height, MerklePath};
use serde::{Deserialize, Serialize};

use crate::{
    client_state::ClientState,
    codec::{decode_client_state, decode_consensus_state, encode_client_state, encode_consensus_state},
    error::ClientError,
    keys,
};

/// Last path segment of an upgraded client state.
pub const UPGRADED_CLIENT_KEY: &str = "upgradedClient";
/// Last path segment of an upgraded consensus state.
pub const UPGRADED_CONSENSUS_STATE_KEY: &str = "upgradedConsState";

/// A scheduled upgrade of this host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Name of the upgrade
    pub name: String,
    /// Host height the upgrade happens at
    pub height: u64,
}

/// Schedules `plan`, replacing any pending plan.
///
/// # Errors
/// Fails on an empty name or a zero height.
pub fn set_upgrade_plan(store: &mut dyn Storage, plan: &Plan) -> Result<(), ClientError> {
    ensure!(
        !plan.name.trim().is_empty(),
        ClientError::InvalidUpgrade {
            client_id: String::new(),
            reason: "plan name cannot be empty".to_string(),
        }
    );
    ensure!(
        plan.height > 0,
        ClientError::InvalidHeight {
            reason: "plan height must be non-zero".to_string(),
        }
    );
    store.set(keys::UPGRADE_PLAN, &serde_json::to_vec(plan).map_err(ClientError::Serialize)?);
    Ok(())
}

/// The pending plan.
///
/// # Errors
/// Fails with [`ClientError::UpgradePlanNotFound`] if none is scheduled.
pub fn upgrade_plan(store: &dyn Storage) -> Result<Plan, ClientError> {
    let bytes = store.get(keys::UPGRADE_PLAN).ok_or(ClientError::UpgradePlanNotFound)?;
    serde_json::from_slice(&bytes).map_err(|err| ClientError::corrupt(keys::UPGRADE_PLAN, err))
}

/// Removes the pending plan and the states committed for it.
///
/// # Errors
/// Fails if the stored plan is corrupt.
pub fn clear_upgrade_plan(store: &mut dyn Storage) -> Result<(), ClientError> {
    let plan = match upgrade_plan(store) {
        Ok(plan) => plan,
        Err(ClientError::UpgradePlanNotFound) => return Ok(()),
        Err(err) => return Err(err),
    };
    store.remove(keys::UPGRADE_PLAN);
    store.remove(&keys::upgraded_client_state(plan.height));
    store.remove(&keys::upgraded_consensus_state(plan.height));
    Ok(())
}

/// Commits the client state counterparties upgrade to at `plan_height`.
/// Only its identity is stored.
///
/// # Errors
/// Fails if the state cannot be serialized.
pub fn set_upgraded_client_state(
    store: &mut dyn Storage,
    plan_height: u64,
    client_state: &ClientState,
) -> Result<(), ClientError> {
    store.set(
        &keys::upgraded_client_state(plan_height),
        &encode_client_state(&client_state.zeroed())?,
    );
    Ok(())
}

/// Commits the consensus state counterparties upgrade to at `plan_height`.
///
/// # Errors
/// Fails if the state cannot be serialized.
pub fn set_upgraded_consensus_state(
    store: &mut dyn Storage,
    plan_height: u64,
    consensus_state: &ConsensusState,
) -> Result<(), ClientError> {
    store.set(
        &keys::upgraded_consensus_state(plan_height),
        &encode_consensus_state(consensus_state)?,
    );
    Ok(())
}

/// The packed upgraded client state of the pending plan.
///
/// # Errors
/// Fails if no plan is pending, no state was committed for it, or the
/// stored bytes are corrupt.
pub fn upgraded_client_state(store: &dyn Storage) -> Result<(ClientState, Vec<u8>), ClientError> {
    let plan = upgrade_plan(store)?;
    let key = keys::upgraded_client_state(plan.height);
    let bytes = store
        .get(&key)
        .ok_or(ClientError::UpgradedClientNotFound { height: plan.height })?;
    Ok((decode_client_state(&key, &bytes)?, bytes))
}

/// The packed upgraded consensus state committed at `height`.
///
/// # Errors
/// Fails on a zero height, if no plan is pending, if nothing was committed
/// at `height`, or if the stored bytes are corrupt.
pub fn upgraded_consensus_state(
    store: &dyn Storage,
    height: u64,
) -> Result<(ConsensusState, Vec<u8>), ClientError> {
    ensure!(
        height > 0,
        ClientError::InvalidHeight {
            reason: "upgrade height must be non-zero".to_string(),
        }
    );
    upgrade_plan(store)?;
    let key = keys::upgraded_consensus_state(height);
    let bytes = store
        .get(&key)
        .ok_or(ClientError::UpgradedConsensusStateNotFound { height })?;
    Ok((decode_consensus_state(&key, &bytes)?, bytes))
}

/// The absolute counterparty paths of the upgraded client and consensus
/// states committed for an upgrade at `latest_height`.
///
/// # Errors
/// Fails if `upgrade_path` is empty.
pub fn upgrade_paths(
    client_id: &str,
    upgrade_path: &[String],
    latest_height: Height,
) -> Result<(MerklePath, MerklePath), ClientError> {
    let Some((last, store_path)) = upgrade_path.split_last() else {
        return Err(ClientError::InvalidUpgrade {
            client_id: client_id.to_string(),
            reason: "client has no upgrade path".to_string(),
        });
    };
    let key = |suffix: &str| format!("{last}/{}/{suffix}", latest_height.revision_height());
    let path = |suffix: &str| {
        MerklePath::new(
            store_path
                .iter()
                .cloned()
                .chain(std::iter::once(key(suffix))),
        )
    };
    Ok((path(UPGRADED_CLIENT_KEY), path(UPGRADED_CONSENSUS_STATE_KEY)))
}
