//! Cursor and offset pagination over a store prefix

use cosmwasm_std::{Binary, Order, Storage};
use ibc_client_host_types::{ensure, storage::prefix_end};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Page size used when a request does not set a limit.
pub const DEFAULT_LIMIT: u64 = 100;

/// Which page of a listing to return.
///
/// `key` is the opaque cursor returned as `next_key` by the previous page.
/// It cannot be combined with `offset`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    /// Cursor to resume from
    pub key: Option<Binary>,
    /// Entries to skip, without a cursor
    pub offset: u64,
    /// Maximum entries to return, zero means [`DEFAULT_LIMIT`]
    pub limit: u64,
    /// Whether to return the total count, without a cursor
    pub count_total: bool,
    /// Descending order
    pub reverse: bool,
}

/// Where a listing stopped.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    /// Cursor of the next page, `None` on the last page
    pub next_key: Option<Binary>,
    /// Total number of entries, if requested
    pub total: Option<u64>,
}

/// Lists entries under `prefix`.
///
/// `select` maps a key (relative to `prefix`) and value to an item, or
/// `None` to skip the entry entirely; skipped entries neither fill the page
/// nor count towards the total.
///
/// # Errors
/// Fails on conflicting pagination parameters and on any error of `select`.
pub fn paginate<T>(
    store: &dyn Storage,
    prefix: &[u8],
    page: &PageRequest,
    select: impl FnMut(&[u8], &[u8]) -> Result<Option<T>, ClientError>,
) -> Result<(Vec<T>, PageResponse), ClientError> {
    paginate_within(store, prefix, (None, None), page, select)
}

/// Lists entries under `prefix` whose relative key is in `[lower, upper)`.
///
/// A cursor outside the bounds yields an empty page.
///
/// # Errors
/// As [`paginate`].
pub fn paginate_within<T>(
    store: &dyn Storage,
    prefix: &[u8],
    (lower, upper): (Option<&[u8]>, Option<&[u8]>),
    page: &PageRequest,
    mut select: impl FnMut(&[u8], &[u8]) -> Result<Option<T>, ClientError>,
) -> Result<(Vec<T>, PageResponse), ClientError> {
    ensure!(
        page.key.is_none() || page.offset == 0,
        ClientError::InvalidPagination {
            reason: "either offset or key is expected, got both".to_string(),
        }
    );
    let limit = if page.limit == 0 { DEFAULT_LIMIT } else { page.limit };
    let count_total = page.count_total && page.key.is_none();

    let mut start = lower.map_or_else(|| prefix.to_vec(), |lower| [prefix, lower].concat());
    let mut end = upper.map_or_else(|| prefix_end(prefix), |upper| Some([prefix, upper].concat()));
    let order = if page.reverse { Order::Descending } else { Order::Ascending };
    if let Some(key) = &page.key {
        let cursor = [prefix, key.as_slice()].concat();
        if page.reverse {
            // the cursor itself is part of the page
            let mut inclusive = cursor;
            inclusive.push(0);
            if !end.as_ref().is_some_and(|end| *end <= inclusive) {
                end = Some(inclusive);
            }
        } else if cursor > start {
            start = cursor;
        }
    }
    if end.as_ref().is_some_and(|end| *end <= start) {
        return Ok((
            Vec::new(),
            PageResponse {
                next_key: None,
                total: count_total.then_some(0),
            },
        ));
    }

    let mut items = Vec::new();
    let mut next_key = None;
    let mut skipped = 0u64;
    let mut total = 0u64;
    for (key, value) in store.range(Some(start.as_slice()), end.as_deref(), order) {
        let relative = &key[prefix.len()..];
        let Some(item) = select(relative, &value)? else {
            continue;
        };
        total += 1;
        if skipped < page.offset {
            skipped += 1;
            continue;
        }
        if u64::try_from(items.len()).unwrap_or(u64::MAX) < limit {
            items.push(item);
            continue;
        }
        if next_key.is_none() {
            next_key = Some(Binary::from(relative));
        }
        if !count_total {
            break;
        }
    }

    Ok((
        items,
        PageResponse {
            next_key,
            total: count_total.then_some(total),
        },
    ))
}
