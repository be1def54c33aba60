//! Derived trust status of a light client.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Client status, recomputed on every query and never stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// The client is trusted and may be used for verification.
    Active,
    /// The latest consensus state is outside the trusting period, or missing.
    Expired,
    /// Misbehaviour was detected; terminal.
    Frozen,
    /// The status could not be determined.
    Unknown,
}

impl Status {
    /// Whether the client can be updated and used for verification.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// The canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Expired => "Expired",
            Self::Frozen => "Frozen",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strings reported by verification code map onto a status; anything
/// unrecognised is `Unknown`.
impl From<&str> for Status {
    fn from(status: &str) -> Self {
        match status {
            "Active" => Self::Active,
            "Expired" => Self::Expired,
            "Frozen" => Self::Frozen,
            _ => Self::Unknown,
        }
    }
}
