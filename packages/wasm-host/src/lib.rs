//! Host side of the 08-wasm light client.
//!
//! Verification logic for consensus algorithms the host does not understand
//! natively is supplied as content-addressed code and executed by a
//! [`WasmEngine`]. The [`WasmAdapter`] runs every invocation on a branch of
//! host state, brokers the code's queries back into the host through the
//! [`HostQuerier`], and reports gas on every exit path.
//! Writes made during a `query` are always discarded; writes made during
//! `instantiate` and `sudo` are handed back to the caller to commit.

#![deny(clippy::nursery, clippy::pedantic)]
#![warn(missing_docs)]

pub mod adapter;
pub mod config;
pub mod engine;
pub mod error;
pub mod msg;
pub mod querier;
pub mod registry;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use adapter::{Invocation, WasmAdapter};
pub use config::WasmConfig;
pub use engine::{EntryPoint, Querier, VmContext, VmError, VmOutcome, WasmEngine};
pub use error::{QuerierError, WasmError};
pub use querier::{CustomQuerier, HostQuerier, NoRoutes, QueryPlugins, StargateRouter};
