//! Relative and absolute paths into a commitment tree.

use cosmwasm_std::Binary;
use serde::{Deserialize, Serialize};

/// Ordered path segments locating a key in a nested commitment tree, root first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePath {
    /// The path segments
    pub key_path: Vec<Binary>,
}

impl MerklePath {
    /// Creates a path from raw segments.
    #[must_use]
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        Self {
            key_path: segments
                .into_iter()
                .map(|segment| Binary::new(segment.into()))
                .collect(),
        }
    }

    /// Whether the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.key_path.is_empty()
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.key_path.len()
    }

    /// Prepends `prefix` as the outermost segment.
    #[must_use]
    pub fn with_prefix(&self, prefix: &[u8]) -> Self {
        let mut key_path = Vec::with_capacity(self.key_path.len() + 1);
        key_path.push(Binary::from(prefix));
        key_path.extend(self.key_path.iter().cloned());
        Self { key_path }
    }
}
