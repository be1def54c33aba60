//! The seam between the host and the virtual machine executing verification code

use cosmwasm_std::{Binary, Checksum, Env, Storage};

use crate::{error::QuerierError, msg::QueryRequest};

/// The entry point being invoked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryPoint {
    /// Called once when a client is created
    Instantiate,
    /// Read-only calls; writes are discarded on return
    Query,
    /// State transitions; writes are handed back to be committed
    Sudo,
}

impl EntryPoint {
    /// Lower case name used in logs and gas descriptors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Instantiate => "instantiate",
            Self::Query => "query",
            Self::Sudo => "sudo",
        }
    }
}

/// The controlled channel from verification code back into the host.
pub trait Querier {
    /// Answers a query issued by the code.
    ///
    /// # Errors
    /// Returns an error if the query is not permitted or fails.
    fn query(&self, request: &QueryRequest) -> Result<Binary, QuerierError>;
}

/// Everything an invocation may touch.
pub struct VmContext<'a> {
    /// The host environment presented to the code
    pub env: &'a Env,
    /// The client's view of host state
    pub store: &'a mut dyn Storage,
    /// The query channel back into the host
    pub querier: &'a dyn Querier,
    /// The execution budget for the call
    pub gas_limit: u64,
}

/// Errors raised by the engine while executing code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VmError {
    /// The code exhausted its execution budget
    #[error("out of gas: limit {limit}")]
    OutOfGas {
        /// The budget the call was given
        limit: u64,
    },
    /// The code is not loadable
    #[error("invalid code: {reason}")]
    InvalidCode {
        /// Why the code was rejected
        reason: String,
    },
    /// No code is loaded under the checksum
    #[error("code not found: {checksum}")]
    CodeNotFound {
        /// The checksum that was requested
        checksum: String,
    },
    /// The code returned an error
    #[error("contract error: {0}")]
    Contract(String),
}

/// The result of executing code: gas is reported even when the call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmOutcome {
    /// The response bytes or the failure
    pub result: Result<Binary, VmError>,
    /// Gas consumed by execution, excluding host queries
    pub gas_used: u64,
}

impl VmOutcome {
    /// A failure that consumed `gas_used`.
    #[must_use]
    pub const fn failed(err: VmError, gas_used: u64) -> Self {
        Self {
            result: Err(err),
            gas_used,
        }
    }
}

/// A virtual machine able to load and run verification code.
///
/// Implementations must be deterministic: the same code, message, store
/// contents and query answers always produce the same outcome.
pub trait WasmEngine {
    /// Loads `code` so that it can later be run under `checksum`.
    ///
    /// # Errors
    /// Returns an error if the code is not valid for this engine.
    fn load_code(&self, checksum: &Checksum, code: &[u8]) -> Result<(), VmError>;

    /// Runs `entry_point` of the code loaded under `checksum` with `msg`.
    fn call(
        &self,
        entry_point: EntryPoint,
        checksum: &Checksum,
        msg: &[u8],
        ctx: VmContext<'_>,
    ) -> VmOutcome;
}
