//! Error classification shared by every layer of the host.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse classification of a failure, used by callers to tell bad input
/// apart from an untrustworthy client or corrupt state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A required field is malformed, empty, or zero.
    InvalidArgument,
    /// An unknown client, height, plan, or checksum.
    NotFound,
    /// The client is in a state that forbids the operation.
    FailedPrecondition,
    /// A proof or signature failed verification.
    Unauthenticated,
    /// A gas budget was exceeded.
    ResourceExhausted,
    /// Corrupt stored bytes or a failure serializing trusted data.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::InvalidArgument => "invalid argument",
            Self::NotFound => "not found",
            Self::FailedPrecondition => "failed precondition",
            Self::Unauthenticated => "unauthenticated",
            Self::ResourceExhausted => "resource exhausted",
            Self::Internal => "internal",
        };
        f.write_str(kind)
    }
}
