//! Storage views layered over the host key-value store.
//!
//! [`CacheStorage`] is a copy-on-write branch of a parent store: reads fall
//! through to the parent, writes stay in the branch until the caller takes
//! them with [`CacheStorage::into_writes`] and commits them explicitly.
//! [`SharedBranch`] hands out several [`Storage`] handles onto one branch so
//! that verification code and the host querier it re-enters observe the same
//! speculative writes. [`PrefixedStorage`] scopes a store to a key prefix.

use std::{
    cell::RefCell,
    cmp::Ordering,
    collections::BTreeMap,
    iter::Peekable,
    ops::Bound,
};

use cosmwasm_std::{Order, Record, Storage};

/// Writes staged in a branch. `None` marks a deletion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StagedWrites(BTreeMap<Vec<u8>, Option<Vec<u8>>>);

impl StagedWrites {
    /// Whether nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of staged keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The staged value for `key`: `Some(None)` if it was deleted.
    #[must_use]
    pub fn get(&self, key: &[u8]) -> Option<Option<&[u8]>> {
        self.0.get(key).map(Option::as_deref)
    }

    /// Iterates staged keys in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], Option<&[u8]>)> {
        self.0
            .iter()
            .map(|(key, value)| (key.as_slice(), value.as_deref()))
    }

    /// Applies the writes to `store`.
    pub fn commit(self, store: &mut dyn Storage) {
        for (key, value) in self.0 {
            match value {
                Some(value) => store.set(&key, &value),
                None => store.remove(&key),
            }
        }
    }
}

/// A copy-on-write branch over a read-only parent store.
pub struct CacheStorage<'a> {
    parent: &'a dyn Storage,
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a> CacheStorage<'a> {
    /// Branches `parent`.
    #[must_use]
    pub fn new(parent: &'a dyn Storage) -> Self {
        Self {
            parent,
            writes: BTreeMap::new(),
        }
    }

    /// Ends the branch, returning what was written to it.
    #[must_use]
    pub fn into_writes(self) -> StagedWrites {
        StagedWrites(self.writes)
    }
}

impl Storage for CacheStorage<'_> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.writes.get(key) {
            Some(staged) => staged.clone(),
            None => self.parent.get(key),
        }
    }

    fn range<'b>(
        &'b self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'b> {
        if let (Some(start), Some(end)) = (start, end) {
            if start >= end {
                return Box::new(std::iter::empty());
            }
        }

        let lower = start.map_or(Bound::Unbounded, |s| Bound::Included(s.to_vec()));
        let upper = end.map_or(Bound::Unbounded, |e| Bound::Excluded(e.to_vec()));
        let mut overlay: Vec<(Vec<u8>, Option<Vec<u8>>)> = self
            .writes
            .range((lower, upper))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        if order == Order::Descending {
            overlay.reverse();
        }

        Box::new(MergedRange {
            parent: self.parent.range(start, end, order).peekable(),
            overlay: overlay.into_iter().peekable(),
            order,
        })
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        // empty values are not storable, treat them as removals
        let value = (!value.is_empty()).then(|| value.to_vec());
        self.writes.insert(key.to_vec(), value);
    }

    fn remove(&mut self, key: &[u8]) {
        self.writes.insert(key.to_vec(), None);
    }
}

enum Step {
    Parent,
    Overlay,
    Shadowed,
}

/// Merges a parent range with the overlay writes of a branch, both in `order`.
struct MergedRange<'b> {
    parent: Peekable<Box<dyn Iterator<Item = Record> + 'b>>,
    overlay: Peekable<std::vec::IntoIter<(Vec<u8>, Option<Vec<u8>>)>>,
    order: Order,
}

impl Iterator for MergedRange<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        loop {
            let step = match (self.parent.peek(), self.overlay.peek()) {
                (None, None) => return None,
                (Some(_), None) => Step::Parent,
                (None, Some(_)) => Step::Overlay,
                (Some((parent_key, _)), Some((overlay_key, _))) => {
                    let ordering = match self.order {
                        Order::Ascending => parent_key.cmp(overlay_key),
                        Order::Descending => overlay_key.cmp(parent_key),
                    };
                    match ordering {
                        Ordering::Less => Step::Parent,
                        Ordering::Greater => Step::Overlay,
                        Ordering::Equal => Step::Shadowed,
                    }
                }
            };

            match step {
                Step::Parent => return self.parent.next(),
                Step::Shadowed => {
                    self.parent.next();
                }
                Step::Overlay => {}
            }
            if let Some((key, Some(value))) = self.overlay.next() {
                return Some((key, value));
            }
        }
    }
}

/// A branch that several [`BranchHandle`]s can read and write at once.
///
/// Every handle operation borrows the branch only for its own duration, so a
/// handle may be used re-entrantly from inside a call made through another.
pub struct SharedBranch<'a> {
    cache: RefCell<CacheStorage<'a>>,
}

impl<'a> SharedBranch<'a> {
    /// Branches `parent`.
    #[must_use]
    pub fn new(parent: &'a dyn Storage) -> Self {
        Self {
            cache: RefCell::new(CacheStorage::new(parent)),
        }
    }

    /// A new handle onto this branch.
    #[must_use]
    pub const fn handle(&self) -> BranchHandle<'_, 'a> {
        BranchHandle { cache: &self.cache }
    }

    /// Ends the branch, returning what was written to it.
    #[must_use]
    pub fn into_writes(self) -> StagedWrites {
        self.cache.into_inner().into_writes()
    }
}

/// A [`Storage`] handle onto a [`SharedBranch`].
#[derive(Clone, Copy)]
pub struct BranchHandle<'b, 'a> {
    cache: &'b RefCell<CacheStorage<'a>>,
}

impl Storage for BranchHandle<'_, '_> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.cache.borrow().get(key)
    }

    fn range<'c>(
        &'c self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'c> {
        let records: Vec<Record> = self.cache.borrow().range(start, end, order).collect();
        Box::new(records.into_iter())
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        self.cache.borrow_mut().set(key, value);
    }

    fn remove(&mut self, key: &[u8]) {
        self.cache.borrow_mut().remove(key);
    }
}

/// A store scoped to every key starting with `prefix`.
pub struct PrefixedStorage<'a> {
    storage: &'a mut dyn Storage,
    prefix: Vec<u8>,
}

impl<'a> PrefixedStorage<'a> {
    /// Scopes `storage` to `prefix`.
    #[must_use]
    pub fn new(storage: &'a mut dyn Storage, prefix: &[u8]) -> Self {
        Self {
            storage,
            prefix: prefix.to_vec(),
        }
    }

    fn full_key(&self, key: &[u8]) -> Vec<u8> {
        [self.prefix.as_slice(), key].concat()
    }
}

impl Storage for PrefixedStorage<'_> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.storage.get(&self.full_key(key))
    }

    fn range<'b>(
        &'b self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'b> {
        let start = self.full_key(start.unwrap_or_default());
        let end = end.map_or_else(|| prefix_end(&self.prefix), |end| Some(self.full_key(end)));
        let prefix_len = self.prefix.len();
        Box::new(
            self.storage
                .range(Some(&start), end.as_deref(), order)
                .map(move |(key, value)| (key[prefix_len..].to_vec(), value)),
        )
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        let key = self.full_key(key);
        self.storage.set(&key, value);
    }

    fn remove(&mut self, key: &[u8]) {
        let key = self.full_key(key);
        self.storage.remove(&key);
    }
}

/// The smallest key greater than every key starting with `prefix`, or `None`
/// if no such key exists.
#[must_use]
pub fn prefix_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use cosmwasm_std::MemoryStorage;

    use super::*;

    fn parent() -> MemoryStorage {
        let mut store = MemoryStorage::new();
        store.set(b"a", b"1");
        store.set(b"b", b"2");
        store.set(b"c", b"3");
        store
    }

    fn keys(iter: impl Iterator<Item = Record>) -> Vec<Vec<u8>> {
        iter.map(|(key, _)| key).collect()
    }

    #[test]
    fn branch_reads_through_and_shadows() {
        let parent = parent();
        let mut branch = CacheStorage::new(&parent);
        branch.set(b"b", b"20");
        branch.remove(b"c");
        branch.set(b"d", b"4");

        assert_eq!(branch.get(b"a"), Some(b"1".to_vec()));
        assert_eq!(branch.get(b"b"), Some(b"20".to_vec()));
        assert_eq!(branch.get(b"c"), None);
        assert_eq!(parent.get(b"b"), Some(b"2".to_vec()));
        assert_eq!(parent.get(b"d"), None);
    }

    #[rstest::rstest]
    #[case::ascending(Order::Ascending, vec![b"a".to_vec(), b"b".to_vec(), b"bb".to_vec(), b"d".to_vec()])]
    #[case::descending(Order::Descending, vec![b"d".to_vec(), b"bb".to_vec(), b"b".to_vec(), b"a".to_vec()])]
    fn branch_range_merges_overlay(#[case] order: Order, #[case] expected: Vec<Vec<u8>>) {
        let parent = parent();
        let mut branch = CacheStorage::new(&parent);
        branch.set(b"bb", b"x");
        branch.remove(b"c");
        branch.set(b"d", b"4");

        assert_eq!(keys(branch.range(None, None, order)), expected);
    }

    #[test]
    fn branch_range_respects_bounds() {
        let parent = parent();
        let mut branch = CacheStorage::new(&parent);
        branch.set(b"bb", b"x");
        branch.set(b"c", b"30");

        let records: Vec<Record> = branch.range(Some(b"b".as_slice()), Some(b"c".as_slice()), Order::Ascending).collect();
        assert_eq!(
            records,
            vec![(b"b".to_vec(), b"2".to_vec()), (b"bb".to_vec(), b"x".to_vec())]
        );
        assert_eq!(branch.range(Some(b"c".as_slice()), Some(b"b".as_slice()), Order::Ascending).count(), 0);
    }

    #[test]
    fn writes_commit_only_when_applied() {
        let mut parent = parent();
        let writes = {
            let mut branch = CacheStorage::new(&parent);
            branch.set(b"a", b"10");
            branch.remove(b"b");
            branch.set(b"empty", b"");
            branch.into_writes()
        };
        assert_eq!(writes.len(), 3);
        assert_eq!(writes.get(b"empty"), Some(None));
        assert_eq!(parent.get(b"a"), Some(b"1".to_vec()));

        writes.commit(&mut parent);
        assert_eq!(parent.get(b"a"), Some(b"10".to_vec()));
        assert_eq!(parent.get(b"b"), None);
        assert_eq!(parent.get(b"empty"), None);
    }

    #[test]
    fn nested_branches_see_outer_writes() {
        let parent = parent();
        let mut outer = CacheStorage::new(&parent);
        outer.set(b"k", b"outer");
        let inner_writes = {
            let mut inner = CacheStorage::new(&outer);
            assert_eq!(inner.get(b"k"), Some(b"outer".to_vec()));
            inner.set(b"k2", b"inner");
            inner.into_writes()
        };
        assert_eq!(outer.get(b"k2"), None);
        assert_eq!(inner_writes.get(b"k2"), Some(Some(b"inner".as_slice())));
    }

    #[test]
    fn shared_handles_observe_each_other() {
        let parent = parent();
        let branch = SharedBranch::new(&parent);
        let mut writer = branch.handle();
        let reader = branch.handle();

        writer.set(b"k", b"v");
        assert_eq!(reader.get(b"k"), Some(b"v".to_vec()));
        assert_eq!(reader.range(None, None, Order::Ascending).count(), 4);

        let writes = branch.into_writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(parent.get(b"k"), None);
    }

    #[test]
    fn prefixed_storage_scopes_keys() {
        let mut store = MemoryStorage::new();
        store.set(b"clients/other/x", b"0");
        {
            let mut scoped = PrefixedStorage::new(&mut store, b"clients/a/");
            scoped.set(b"x", b"1");
            scoped.set(b"y", b"2");
            assert_eq!(scoped.get(b"x"), Some(b"1".to_vec()));
            let records: Vec<Record> = scoped.range(None, None, Order::Ascending).collect();
            assert_eq!(
                records,
                vec![(b"x".to_vec(), b"1".to_vec()), (b"y".to_vec(), b"2".to_vec())]
            );
            scoped.remove(b"y");
        }
        assert_eq!(store.get(b"clients/a/x"), Some(b"1".to_vec()));
        assert_eq!(store.get(b"clients/a/y"), None);
        assert_eq!(store.get(b"clients/other/x"), Some(b"0".to_vec()));
    }

    #[rstest::rstest]
    #[case::simple(b"ab".to_vec(), Some(b"ac".to_vec()))]
    #[case::carry(vec![b'a', 0xff], Some(b"b".to_vec()))]
    #[case::all_max(vec![0xff, 0xff], None)]
    fn prefix_end_is_exclusive_bound(#[case] prefix: Vec<u8>, #[case] expected: Option<Vec<u8>>) {
        assert_eq!(prefix_end(&prefix), expected);
    }
}
