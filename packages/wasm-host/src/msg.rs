//! The messages that are passed between the host and the verification code
#![allow(clippy::module_name_repetitions)]

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Binary;

/// The message to instantiate the verification code for a new client
#[cw_serde]
pub struct InstantiateMsg {
    /// The algorithm specific client state bytes
    pub client_state: Binary,
    /// The initial consensus state, JSON encoded
    pub consensus_state: Binary,
    /// The checksum of this wasm code
    pub checksum: Binary,
}

/// The sudo messages called by the host; writes are persisted
#[cw_serde]
pub enum SudoMsg {
    /// The message to update the client state
    UpdateState(UpdateStateMsg),
    /// The message to freeze the client after misbehaviour
    UpdateStateOnMisbehaviour(UpdateStateOnMisbehaviourMsg),
    /// The message to verify an upgrade and swap to the upgraded state
    VerifyUpgradeAndUpdateState(VerifyUpgradeAndUpdateStateMsg),
}

/// The query messages called by the host; writes are discarded
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// The message to verify the client message
    #[returns(EmptyResult)]
    VerifyClientMessage(VerifyClientMessageMsg),

    /// The message to check for misbehaviour
    #[returns(CheckForMisbehaviourResult)]
    CheckForMisbehaviour(CheckForMisbehaviourMsg),

    /// The message to get the timestamp at height
    #[returns(TimestampAtHeightResult)]
    TimestampAtHeight(TimestampAtHeightMsg),

    /// The message to get the status
    #[returns(StatusResult)]
    Status(StatusMsg),

    /// Verify membership of a value at a path
    #[returns(EmptyResult)]
    VerifyMembership(VerifyMembershipMsg),

    /// Verify absence of a value at a path
    #[returns(EmptyResult)]
    VerifyNonMembership(VerifyNonMembershipMsg),
}

impl QueryMsg {
    /// Name of the message as it appears on the wire.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::VerifyClientMessage(_) => "verify_client_message",
            Self::CheckForMisbehaviour(_) => "check_for_misbehaviour",
            Self::TimestampAtHeight(_) => "timestamp_at_height",
            Self::Status(_) => "status",
            Self::VerifyMembership(_) => "verify_membership",
            Self::VerifyNonMembership(_) => "verify_non_membership",
        }
    }
}

impl SudoMsg {
    /// Name of the message as it appears on the wire.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UpdateState(_) => "update_state",
            Self::UpdateStateOnMisbehaviour(_) => "update_state_on_misbehaviour",
            Self::VerifyUpgradeAndUpdateState(_) => "verify_upgrade_and_update_state",
        }
    }
}

/// Update state message
#[cw_serde]
pub struct UpdateStateMsg {
    /// The client message
    pub client_message: Binary,
}

/// Update state on misbehaviour message
#[cw_serde]
pub struct UpdateStateOnMisbehaviourMsg {
    /// The client message
    pub client_message: Binary,
}

/// Verify upgrade and update state message
#[cw_serde]
pub struct VerifyUpgradeAndUpdateStateMsg {
    /// The upgraded client state
    pub upgrade_client_state: Binary,
    /// The upgraded consensus state
    pub upgrade_consensus_state: Binary,
    /// The proof of the upgraded client state
    pub proof_upgrade_client: Binary,
    /// The proof of the upgraded consensus state
    pub proof_upgrade_consensus_state: Binary,
}

/// The merkle path
#[cw_serde]
pub struct MerklePath {
    /// The key path
    pub key_path: Vec<Binary>,
}

/// Verify membership message
#[cw_serde]
pub struct VerifyMembershipMsg {
    /// The proof height
    pub height: Height,
    /// The delay time period
    pub delay_time_period: u64,
    /// The delay block period
    pub delay_block_period: u64,
    /// The proof bytes
    pub proof: Binary,
    /// The absolute path to the value, commitment prefix included
    pub merkle_path: MerklePath,
    /// The value to verify against the proof
    pub value: Binary,
}

/// Verify non-membership message
#[cw_serde]
pub struct VerifyNonMembershipMsg {
    /// The proof height
    pub height: Height,
    /// The delay time period
    pub delay_time_period: u64,
    /// The delay block period
    pub delay_block_period: u64,
    /// The proof bytes
    pub proof: Binary,
    /// The absolute path to the empty value
    pub merkle_path: MerklePath,
}

/// The message to verify the client message
#[cw_serde]
pub struct VerifyClientMessageMsg {
    /// The client message to verify
    pub client_message: Binary,
}

/// The message to check for misbehaviour
#[cw_serde]
pub struct CheckForMisbehaviourMsg {
    /// The client message to check
    pub client_message: Binary,
}

/// The message to get the timestamp at height
#[cw_serde]
pub struct TimestampAtHeightMsg {
    /// The height to get the timestamp at
    pub height: Height,
}

/// The status query message
#[cw_serde]
pub struct StatusMsg {}

/// Height of the counterparty chain
#[cw_serde]
#[derive(Copy, Eq, PartialOrd, Ord)]
pub struct Height {
    /// The revision that the client is currently on
    #[serde(default)]
    pub revision_number: u64,
    /// The height within the revision
    #[serde(default)]
    pub revision_height: u64,
}

impl From<ibc_client_host_types::Height> for Height {
    fn from(height: ibc_client_host_types::Height) -> Self {
        Self {
            revision_number: height.revision_number(),
            revision_height: height.revision_height(),
        }
    }
}

impl From<Height> for ibc_client_host_types::Height {
    fn from(height: Height) -> Self {
        Self::new(height.revision_number, height.revision_height)
    }
}

impl From<&ibc_client_host_types::MerklePath> for MerklePath {
    fn from(path: &ibc_client_host_types::MerklePath) -> Self {
        Self {
            key_path: path.key_path.clone(),
        }
    }
}

impl From<MerklePath> for ibc_client_host_types::MerklePath {
    fn from(path: MerklePath) -> Self {
        Self {
            key_path: path.key_path,
        }
    }
}

/// The result of updating the client state
#[cw_serde]
pub struct UpdateStateResult {
    /// The updated client state heights
    pub heights: Vec<Height>,
}

/// The response to the status query
#[cw_serde]
pub struct StatusResult {
    /// The status of the client
    pub status: String,
}

/// The response to the check for misbehaviour query
#[cw_serde]
pub struct CheckForMisbehaviourResult {
    /// Whether the client has found misbehaviour
    pub found_misbehaviour: bool,
}

/// The response to the timestamp at height query
#[cw_serde]
pub struct TimestampAtHeightResult {
    /// The timestamp at the height (in nanoseconds)
    pub timestamp: u64,
}

/// The response of calls that return nothing
#[cw_serde]
#[derive(Default)]
pub struct EmptyResult {}

/// A query issued by verification code back into the host
#[cw_serde]
pub enum QueryRequest {
    /// Opaque request for the host's custom query handler
    Custom(serde_json::Value),
    /// Typed request identified by a fully qualified gRPC method path
    Stargate {
        /// e.g. `/ibc.core.client.v1.Query/VerifyMembership`
        path: String,
        /// Protobuf encoded request
        data: Binary,
    },
}
