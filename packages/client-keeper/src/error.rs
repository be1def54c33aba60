//! Defines the [`ClientError`] type.
#![allow(clippy::module_name_repetitions)]

use attestor_light_client::IbcAttestorClientError;
use ibc_client_host_commitment::CommitmentError;
use ibc_client_host_types::{ErrorKind, Height, IdentifierError, OutOfGas, Status};
use ibc_client_host_wasm::WasmError;
use thiserror::Error;

/// Errors returned by client lifecycle and query operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request was absent
    #[error("empty request")]
    EmptyRequest,

    /// The client identifier is malformed
    #[error("invalid client identifier: {0}")]
    InvalidClientId(#[from] IdentifierError),

    /// The client type may not be created on this host
    #[error("client type `{client_type}` is not allowed")]
    ClientTypeNotAllowed {
        /// The rejected client type
        client_type: String,
    },

    /// No client is stored under the identifier
    #[error("client `{client_id}` not found")]
    ClientNotFound {
        /// The requested client
        client_id: String,
    },

    /// The client state is unusable
    #[error("invalid client state: {reason}")]
    InvalidClientState {
        /// Why the state was rejected
        reason: String,
    },

    /// The consensus state is unusable
    #[error("invalid consensus state: {reason}")]
    InvalidConsensusState {
        /// Why the state was rejected
        reason: String,
    },

    /// A height argument is unusable
    #[error("invalid height: {reason}")]
    InvalidHeight {
        /// Why the height was rejected
        reason: String,
    },

    /// No consensus state is stored at the height
    #[error("consensus state for client `{client_id}` at height {height} not found")]
    ConsensusStateNotFound {
        /// The client
        client_id: String,
        /// The requested height
        height: Height,
    },

    /// A consensus state is already stored at the height
    #[error("consensus state for client `{client_id}` at height {height} already exists")]
    ConsensusStateExists {
        /// The client
        client_id: String,
        /// The occupied height
        height: Height,
    },

    /// Consensus state heights must strictly increase
    #[error("consensus state height {height} for client `{client_id}` must exceed the latest stored height {latest}")]
    HeightNotIncreasing {
        /// The client
        client_id: String,
        /// The rejected height
        height: Height,
        /// The latest stored height
        latest: Height,
    },

    /// The client is not active
    #[error("client `{client_id}` is not active, status: {status}")]
    ClientNotActive {
        /// The client
        client_id: String,
        /// Its current status
        status: Status,
    },

    /// No upgrade plan is stored
    #[error("upgrade plan not found")]
    UpgradePlanNotFound,

    /// No upgraded client state is stored for the plan
    #[error("upgraded client state at height {height} not found")]
    UpgradedClientNotFound {
        /// The plan height
        height: u64,
    },

    /// No upgraded consensus state is stored at the height
    #[error("upgraded consensus state at height {height} not found")]
    UpgradedConsensusStateNotFound {
        /// The requested height
        height: u64,
    },

    /// An upgrade request is malformed
    #[error("invalid upgrade for client `{client_id}`: {reason}")]
    InvalidUpgrade {
        /// The client
        client_id: String,
        /// Why the upgrade was rejected
        reason: String,
    },

    /// Pagination parameters conflict
    #[error("invalid pagination: {reason}")]
    InvalidPagination {
        /// Why the request was rejected
        reason: String,
    },

    /// Proof verification failed
    #[error("client `{client_id}`: {source}")]
    Commitment {
        /// The verifying client
        client_id: String,
        /// The verifier error
        #[source]
        source: CommitmentError,
    },

    /// The attestor algorithm rejected a message or state
    #[error("client `{client_id}`: {source}")]
    Attestor {
        /// The client
        client_id: String,
        /// The algorithm error
        #[source]
        source: IbcAttestorClientError,
    },

    /// Verification code failed
    #[error("client `{client_id}`: {source}")]
    Wasm {
        /// The client
        client_id: String,
        /// The adapter error
        #[source]
        source: WasmError,
    },

    /// Verification code attempted a write the host does not permit
    #[error("client `{client_id}`: rejected write to `{key}`: {reason}")]
    WriteRejected {
        /// The client
        client_id: String,
        /// The offending key
        key: String,
        /// Why the write was rejected
        reason: String,
    },

    /// Gas ran out
    #[error(transparent)]
    OutOfGas(#[from] OutOfGas),

    /// Stored bytes could not be decoded
    #[error("corrupt store entry `{key}`: {reason}")]
    Corrupt {
        /// The store key
        key: String,
        /// The decoding failure
        reason: String,
    },

    /// Trusted internal data could not be serialized
    #[error("serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl ClientError {
    /// The error class a caller observes.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyRequest
            | Self::InvalidClientId(_)
            | Self::ClientTypeNotAllowed { .. }
            | Self::InvalidClientState { .. }
            | Self::InvalidConsensusState { .. }
            | Self::InvalidHeight { .. }
            | Self::ConsensusStateExists { .. }
            | Self::HeightNotIncreasing { .. }
            | Self::InvalidUpgrade { .. }
            | Self::InvalidPagination { .. } => ErrorKind::InvalidArgument,
            Self::ClientNotFound { .. }
            | Self::ConsensusStateNotFound { .. }
            | Self::UpgradePlanNotFound
            | Self::UpgradedClientNotFound { .. }
            | Self::UpgradedConsensusStateNotFound { .. } => ErrorKind::NotFound,
            Self::ClientNotActive { .. } => ErrorKind::FailedPrecondition,
            Self::Commitment { source, .. } => source.kind(),
            Self::Attestor { source, .. } => source.kind(),
            Self::Wasm { source, .. } => source.kind(),
            Self::WriteRejected { .. } => ErrorKind::Unauthenticated,
            Self::OutOfGas(_) => ErrorKind::ResourceExhausted,
            Self::Corrupt { .. } | Self::Serialize(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn corrupt(key: &[u8], reason: impl ToString) -> Self {
        Self::Corrupt {
            key: String::from_utf8_lossy(key).into_owned(),
            reason: reason.to_string(),
        }
    }
}
