//! Defines the [`WasmError`] and [`QuerierError`] types.
#![allow(clippy::module_name_repetitions)]

use ibc_client_host_types::{ErrorKind, OutOfGas};
use thiserror::Error;

use crate::engine::VmError;

/// Errors raised by the host while driving verification code
#[derive(Error, Debug)]
pub enum WasmError {
    /// The submitted code is empty
    #[error("wasm code is empty")]
    EmptyCode,

    /// The submitted code exceeds the configured size
    #[error("wasm code of {size} bytes exceeds the maximum of {max} bytes")]
    CodeTooLarge {
        /// Size of the submitted code
        size: usize,
        /// Configured maximum
        max: usize,
    },

    /// Code with the same checksum is already stored
    #[error("wasm code already exists: {checksum}")]
    CodeExists {
        /// Hex checksum of the code
        checksum: String,
    },

    /// No code is stored under the checksum
    #[error("checksum not found: {checksum}")]
    ChecksumNotFound {
        /// Hex checksum that was requested
        checksum: String,
    },

    /// A checksum is not 32 bytes
    #[error("invalid checksum: {reason}")]
    InvalidChecksum {
        /// Why the checksum was rejected
        reason: String,
    },

    /// The engine rejected the code
    #[error("engine rejected code: {0}")]
    LoadCode(#[source] VmError),

    /// The invocation returned an error
    #[error("{entry_point} failed for {client_id}: {source}")]
    Vm {
        /// The client whose code was invoked
        client_id: String,
        /// The invoked entry point
        entry_point: &'static str,
        /// The engine error
        #[source]
        source: VmError,
    },

    /// The invocation exhausted its gas budget
    #[error(transparent)]
    OutOfGas(#[from] OutOfGas),

    /// Serializing a message for the code failed
    #[error("serializing wasm message failed: {0}")]
    SerializeMsg(#[source] serde_json::Error),

    /// The code returned a response of the wrong shape
    #[error("invalid response from verification code: {0}")]
    InvalidResponse(#[source] serde_json::Error),
}

impl WasmError {
    /// The error class a caller observes.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyCode
            | Self::CodeTooLarge { .. }
            | Self::CodeExists { .. }
            | Self::InvalidChecksum { .. }
            | Self::LoadCode(_) => ErrorKind::InvalidArgument,
            Self::ChecksumNotFound { .. } => ErrorKind::NotFound,
            Self::Vm { source, .. } => match source {
                VmError::OutOfGas { .. } => ErrorKind::ResourceExhausted,
                VmError::CodeNotFound { .. } => ErrorKind::NotFound,
                VmError::InvalidCode { .. } | VmError::Contract(_) => ErrorKind::Unauthenticated,
            },
            Self::OutOfGas(_) => ErrorKind::ResourceExhausted,
            Self::SerializeMsg(_) | Self::InvalidResponse(_) => ErrorKind::Internal,
        }
    }
}

/// Errors returned to verification code from its host queries
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuerierError {
    /// The request kind is not served by this host
    #[error("{0}")]
    Unsupported(String),

    /// The stargate path is not on the accept list
    #[error("'{path}' path is not allowed from the contract")]
    NotAllowed {
        /// The rejected path
        path: String,
    },

    /// The path is accepted but the host has no handler for it
    #[error("no route for '{path}'")]
    NoRoute {
        /// The unrouted path
        path: String,
    },

    /// The request body could not be decoded
    #[error("invalid request for '{path}': {reason}")]
    InvalidRequest {
        /// The requested path
        path: String,
        /// Why decoding failed
        reason: String,
    },

    /// The routed handler failed
    #[error("query '{path}' failed: {reason}")]
    Failed {
        /// The requested path
        path: String,
        /// The handler's error
        reason: String,
    },

    /// The query budget is exhausted
    #[error(transparent)]
    OutOfGas(#[from] OutOfGas),
}
