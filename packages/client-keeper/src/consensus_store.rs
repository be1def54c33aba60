//! Append-only, height ordered store of consensus states per client
//!
//! Every consensus state is stored under its display height and indexed
//! under its big endian height, so range scans over the index are in
//! height order.

use cosmwasm_std::{Binary, Order, Storage};
use ibc_client_host_types::{ensure, storage::prefix_end, ConsensusState, Height};

use crate::{
    codec::{decode_consensus_state, encode_consensus_state},
    error::ClientError,
    keys,
    pagination::{paginate_within, PageRequest, PageResponse},
};

/// A consensus state paired with its height.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConsensusStateWithHeight {
    /// The height
    pub height: Height,
    /// The consensus state at the height
    pub consensus_state: ConsensusState,
}

/// Appends `consensus_state` at `height`.
///
/// # Errors
/// Fails on a zero height, if a consensus state exists at `height`, or if
/// `height` does not exceed the latest stored height.
pub fn put(
    store: &mut dyn Storage,
    client_id: &str,
    height: Height,
    consensus_state: &ConsensusState,
) -> Result<(), ClientError> {
    ensure!(
        !height.is_zero(),
        ClientError::InvalidHeight {
            reason: "consensus state height cannot be zero".to_string(),
        }
    );
    let key = keys::consensus_state(client_id, height);
    ensure!(
        store.get(&key).is_none(),
        ClientError::ConsensusStateExists {
            client_id: client_id.to_string(),
            height,
        }
    );
    if let Some(latest) = latest_height(store, client_id)? {
        ensure!(
            height > latest,
            ClientError::HeightNotIncreasing {
                client_id: client_id.to_string(),
                height,
                latest,
            }
        );
    }

    store.set(&key, &encode_consensus_state(consensus_state)?);
    index(store, client_id, height);
    Ok(())
}

/// Records `height` in the ordered index. The consensus state must already
/// be stored.
pub(crate) fn index(store: &mut dyn Storage, client_id: &str, height: Height) {
    store.set(
        &keys::iterate_consensus_state(client_id, height),
        &keys::consensus_state(client_id, height),
    );
}

/// The consensus state at `height`, if stored.
///
/// # Errors
/// Fails if the stored bytes are corrupt.
pub fn try_get(
    store: &dyn Storage,
    client_id: &str,
    height: Height,
) -> Result<Option<ConsensusState>, ClientError> {
    let key = keys::consensus_state(client_id, height);
    store
        .get(&key)
        .map(|bytes| decode_consensus_state(&key, &bytes))
        .transpose()
}

/// The consensus state at `height`.
///
/// # Errors
/// Fails with [`ClientError::ConsensusStateNotFound`] if none is stored and
/// with [`ClientError::Corrupt`] if the stored bytes are corrupt.
pub fn get(store: &dyn Storage, client_id: &str, height: Height) -> Result<ConsensusState, ClientError> {
    try_get(store, client_id, height)?.ok_or_else(|| ClientError::ConsensusStateNotFound {
        client_id: client_id.to_string(),
        height,
    })
}

/// The highest stored height.
///
/// # Errors
/// Fails if the index is corrupt.
pub fn latest_height(store: &dyn Storage, client_id: &str) -> Result<Option<Height>, ClientError> {
    let mut heights = range(store, client_id, HeightRange::all(), Order::Descending);
    heights.next().transpose()
}

/// The consensus state at the highest stored height.
///
/// # Errors
/// Fails if the stored bytes are corrupt.
pub fn get_latest(store: &dyn Storage, client_id: &str) -> Result<Option<ConsensusStateWithHeight>, ClientError> {
    latest_height(store, client_id)?
        .map(|height| {
            Ok(ConsensusStateWithHeight {
                height,
                consensus_state: get(store, client_id, height)?,
            })
        })
        .transpose()
}

/// The consensus state at the highest height below `height`.
///
/// # Errors
/// Fails if the stored bytes are corrupt.
pub fn previous(
    store: &dyn Storage,
    client_id: &str,
    height: Height,
) -> Result<Option<ConsensusState>, ClientError> {
    let below = range(
        store,
        client_id,
        HeightRange {
            start: None,
            end: Some(height),
        },
        Order::Descending,
    )
    .next();
    below
        .transpose()?
        .map(|height| get(store, client_id, height))
        .transpose()
}

/// The consensus state at the lowest height above `height`.
///
/// # Errors
/// Fails if the stored bytes are corrupt.
pub fn next(store: &dyn Storage, client_id: &str, height: Height) -> Result<Option<ConsensusState>, ClientError> {
    let above = range(
        store,
        client_id,
        HeightRange {
            start: Some(height.increment()),
            end: None,
        },
        Order::Ascending,
    )
    .next();
    above
        .transpose()?
        .map(|height| get(store, client_id, height))
        .transpose()
}

/// Heights in `[start, end)`; an open side is unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeightRange {
    /// Lowest height included
    pub start: Option<Height>,
    /// Lowest height excluded
    pub end: Option<Height>,
}

impl HeightRange {
    /// Every height.
    #[must_use]
    pub const fn all() -> Self {
        Self { start: None, end: None }
    }

    /// Index keys bounding the range, relative to the client's index prefix.
    fn index_bounds(self) -> (Option<[u8; 16]>, Option<[u8; 16]>) {
        (
            self.start.map(|height| height.to_be_bytes()),
            self.end.map(|height| height.to_be_bytes()),
        )
    }
}

/// Lazily iterates stored heights in `range`.
pub fn range<'a>(
    store: &'a dyn Storage,
    client_id: &str,
    range: HeightRange,
    order: Order,
) -> impl Iterator<Item = Result<Height, ClientError>> + 'a {
    let prefix = keys::iterate_consensus_states_prefix(client_id);
    let (lower, upper) = range.index_bounds();
    let start_key = lower.map_or_else(|| prefix.clone(), |lower| [prefix.as_slice(), &lower].concat());
    let end_key = upper.map_or_else(|| prefix_end(&prefix), |upper| Some([prefix.as_slice(), &upper].concat()));
    let prefix_len = prefix.len();
    store
        .range(Some(start_key.as_slice()), end_key.as_deref(), order)
        .map(move |(key, _)| {
            Height::from_be_bytes(&key[prefix_len..]).ok_or_else(|| ClientError::corrupt(&key, "invalid height index"))
        })
}

/// A page of the consensus states in `range`, in height order.
///
/// # Errors
/// Fails on invalid pagination or corrupt stored bytes.
pub fn list(
    store: &dyn Storage,
    client_id: &str,
    range: HeightRange,
    page: &PageRequest,
) -> Result<(Vec<ConsensusStateWithHeight>, PageResponse), ClientError> {
    let (lower, upper) = range.index_bounds();
    paginate_within(
        store,
        &keys::iterate_consensus_states_prefix(client_id),
        (lower.as_ref().map(<[u8; 16]>::as_slice), upper.as_ref().map(<[u8; 16]>::as_slice)),
        page,
        |key, consensus_key| {
            let height = decode_index_key(key)?;
            let bytes = store
                .get(consensus_key)
                .ok_or_else(|| ClientError::corrupt(consensus_key, "indexed consensus state is missing"))?;
            Ok(Some(ConsensusStateWithHeight {
                height,
                consensus_state: decode_consensus_state(consensus_key, &bytes)?,
            }))
        },
    )
}

/// A page of the stored heights in `range`, in height order.
///
/// # Errors
/// Fails on invalid pagination or a corrupt index.
pub fn heights(
    store: &dyn Storage,
    client_id: &str,
    range: HeightRange,
    page: &PageRequest,
) -> Result<(Vec<Height>, PageResponse), ClientError> {
    let (lower, upper) = range.index_bounds();
    paginate_within(
        store,
        &keys::iterate_consensus_states_prefix(client_id),
        (lower.as_ref().map(<[u8; 16]>::as_slice), upper.as_ref().map(<[u8; 16]>::as_slice)),
        page,
        |key, _| decode_index_key(key).map(Some),
    )
}

fn decode_index_key(key: &[u8]) -> Result<Height, ClientError> {
    Height::from_be_bytes(key).ok_or_else(|| ClientError::corrupt(key, "invalid height index"))
}

/// The cursor addressing `height` in [`list`] and [`heights`].
#[must_use]
pub fn cursor(height: Height) -> Binary {
    Binary::from(height.to_be_bytes())
}
