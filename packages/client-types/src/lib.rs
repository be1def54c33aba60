//! Core types of the IBC light client host.
//!
//! Everything here is a leaf: heights, client identifiers, the derived client
//! [`Status`], consensus state snapshots, gas metering and the branched
//! storage views that give verification code copy-on-write isolation.

#![deny(clippy::nursery, clippy::pedantic)]
#![warn(missing_docs)]

pub mod consensus_state;
pub mod env;
pub mod error;
pub mod gas;
pub mod height;
pub mod identifier;
pub mod merkle;
pub mod status;
pub mod storage;

pub use consensus_state::ConsensusState;
pub use env::HostEnv;
pub use error::ErrorKind;
pub use gas::{GasMeter, OutOfGas};
pub use height::Height;
pub use identifier::{ClientId, IdentifierError};
pub use merkle::MerklePath;
pub use status::Status;

/// Ensure that a condition is true, otherwise return an error.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}
