//! Light client lifecycle of an IBC host.
//!
//! The [`Keeper`] creates, updates, freezes, upgrades and verifies proofs
//! against counterparty light clients. Clients either run the built-in
//! attestor algorithm or delegate verification to stored code through the
//! 08-wasm adapter. Consensus states are kept in an append-only, height
//! ordered store and the [`QueryService`] exposes read-only views of it.

#![deny(clippy::nursery, clippy::pedantic)]
#![warn(missing_docs)]

pub mod client_state;
pub mod codec;
pub mod config;
pub mod consensus_store;
pub mod error;
pub mod guard;
pub mod keeper;
pub mod keys;
pub mod pagination;
pub mod proto;
pub mod query;
pub mod router;
pub mod status;
pub mod upgrade;

pub use client_state::{ClientParams, ClientState, WasmParams};
pub use config::{ConfigError, KeeperConfig};
pub use consensus_store::{ConsensusStateWithHeight, HeightRange};
pub use error::ClientError;
pub use keeper::{ClientUpgrade, Keeper, ProofRequest, UpdateResult};
pub use pagination::{PageRequest, PageResponse};
pub use query::QueryService;
pub use upgrade::Plan;
