//! Byte-to-byte attachment maps.

use std::collections::HashMap;

use crate::handle::{Resource, self_loaned, self_loaned_mut};
use crate::payload::Bytes;

/// A map from byte slices to byte slices, used as sample and query
/// attachments.
///
/// Entries are [`Bytes`], so the map always owns or co-owns what it holds.
/// Two insertion flavors exist:
///
/// - [`insert`](SliceMap::insert) takes anything convertible to `Bytes`.
///   Passing an existing `Bytes` *aliases* its allocation (a cheap
///   reference-counted share — the caller's buffer stays valid and no copy
///   is made); passing a `Vec<u8>` or `String` moves it in.
/// - [`insert_copy`](SliceMap::insert_copy) always deep-copies from
///   borrowed slices.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SliceMap {
    inner: HashMap<Bytes, Bytes>,
}

impl SliceMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &[u8]) -> Option<&Bytes> {
        self.inner.get(key)
    }

    /// Returns whether `key` is present.
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.inner.contains_key(key)
    }

    /// Inserts an entry, sharing or taking ownership of the buffers.
    ///
    /// Returns the previous value under that key, if any.
    pub fn insert(&mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) -> Option<Bytes> {
        self.inner.insert(key.into(), value.into())
    }

    /// Inserts an entry by copying both slices.
    pub fn insert_copy(&mut self, key: &[u8], value: &[u8]) -> Option<Bytes> {
        self.inner.insert(Bytes::from(key), Bytes::from(value))
    }

    /// Removes and returns the value stored under `key`.
    pub fn remove(&mut self, key: &[u8]) -> Option<Bytes> {
        self.inner.remove(key)
    }

    /// Iterates over the entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&Bytes, &Bytes)> {
        self.inner.iter()
    }
}

impl Resource for SliceMap {
    const KIND: &'static str = "slice_map";
}

self_loaned!(SliceMap);
self_loaned_mut!(SliceMap);

impl<K: Into<Bytes>, V: Into<Bytes>> FromIterator<(K, V)> for SliceMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl std::fmt::Debug for SliceMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SliceMap({} entries)", self.len())
    }
}
