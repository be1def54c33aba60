#![doc = "Attestor light client for IBC"]
#![deny(clippy::nursery, clippy::pedantic)]
#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::borrow_interior_mutable_const))]

pub mod client_state;
pub mod error;
pub mod header;
pub mod misbehaviour;
pub mod update;
pub mod verify;
pub mod verify_attestation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use client_state::AttestorParams;
pub use error::IbcAttestorClientError;
pub use header::{AttestorSignature, ClientMessage, Header};
pub use misbehaviour::Misbehaviour;
