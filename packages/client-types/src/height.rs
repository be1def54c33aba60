//! Two part logical clock identifying a consensus snapshot.

use std::{fmt, str::FromStr};

use ibc_proto::ibc::core::client::v1::Height as ProtoHeight;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A `(revision_number, revision_height)` pair.
///
/// Heights are totally ordered by revision number first and revision height
/// second. The zero height is a sentinel and never identifies a committed
/// root.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Height {
    revision_number: u64,
    revision_height: u64,
}

/// Error returned when parsing a [`Height`] from its `"{rev}-{height}"` form.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid height `{0}`: expected `{{revision_number}}-{{revision_height}}`")]
pub struct ParseHeightError(pub String);

impl Height {
    /// Creates a new height.
    #[must_use]
    pub const fn new(revision_number: u64, revision_height: u64) -> Self {
        Self {
            revision_number,
            revision_height,
        }
    }

    /// The zero sentinel.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0, 0)
    }

    /// Whether both components are zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.revision_number == 0 && self.revision_height == 0
    }

    /// The revision (epoch) number.
    #[must_use]
    pub const fn revision_number(&self) -> u64 {
        self.revision_number
    }

    /// The height within the revision.
    #[must_use]
    pub const fn revision_height(&self) -> u64 {
        self.revision_height
    }

    /// The next height within the same revision.
    #[must_use]
    pub const fn increment(&self) -> Self {
        Self::new(self.revision_number, self.revision_height.saturating_add(1))
    }

    /// Big endian encoding used as an ordered store key.
    #[must_use]
    pub fn to_be_bytes(&self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.revision_number.to_be_bytes());
        bytes[8..].copy_from_slice(&self.revision_height.to_be_bytes());
        bytes
    }

    /// Inverse of [`Height::to_be_bytes`]. Returns `None` unless given exactly 16 bytes.
    #[must_use]
    pub fn from_be_bytes(bytes: &[u8]) -> Option<Self> {
        let (number, height) = bytes.split_at_checked(8)?;
        Some(Self::new(
            u64::from_be_bytes(number.try_into().ok()?),
            u64::from_be_bytes(height.try_into().ok()?),
        ))
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.revision_number, self.revision_height)
    }
}

impl FromStr for Height {
    type Err = ParseHeightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (number, height) = s
            .split_once('-')
            .ok_or_else(|| ParseHeightError(s.to_string()))?;
        let number = number.parse().map_err(|_| ParseHeightError(s.to_string()))?;
        let height = height.parse().map_err(|_| ParseHeightError(s.to_string()))?;
        Ok(Self::new(number, height))
    }
}

impl From<ProtoHeight> for Height {
    fn from(height: ProtoHeight) -> Self {
        Self::new(height.revision_number, height.revision_height)
    }
}

impl From<Height> for ProtoHeight {
    fn from(height: Height) -> Self {
        Self {
            revision_number: height.revision_number,
            revision_height: height.revision_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case::same_revision(Height::new(0, 5), Height::new(0, 6))]
    #[case::revision_dominates(Height::new(0, 100), Height::new(1, 1))]
    #[case::zero_is_lowest(Height::zero(), Height::new(0, 1))]
    fn orders_by_revision_then_height(#[case] lower: Height, #[case] higher: Height) {
        assert!(lower < higher);
        assert!(higher > lower);
    }

    #[test]
    fn display_and_parse_agree() {
        let height = Height::new(3, 42);
        assert_eq!(height.to_string(), "3-42");
        assert_eq!("3-42".parse::<Height>(), Ok(height));
    }

    #[rstest::rstest]
    #[case::no_separator("342")]
    #[case::not_a_number("a-1")]
    #[case::negative("1--1")]
    fn rejects_malformed_heights(#[case] input: &str) {
        assert!(input.parse::<Height>().is_err());
    }

    #[test]
    fn be_bytes_preserve_ordering() {
        let a = Height::new(0, 255);
        let b = Height::new(0, 256);
        let c = Height::new(1, 0);
        assert!(a.to_be_bytes() < b.to_be_bytes());
        assert!(b.to_be_bytes() < c.to_be_bytes());
        assert_eq!(Height::from_be_bytes(&c.to_be_bytes()), Some(c));
        assert_eq!(Height::from_be_bytes(&[0u8; 15]), None);
    }

    #[test]
    fn zero_sentinel() {
        assert!(Height::zero().is_zero());
        assert!(!Height::new(0, 1).is_zero());
        assert!(!Height::new(1, 0).is_zero());
        assert_eq!(Height::new(0, 1).increment(), Height::new(0, 2));
    }
}
