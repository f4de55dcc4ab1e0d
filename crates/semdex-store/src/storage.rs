use crate::error::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

/// Opaque wrapper around the underlying storage engine (sled).
#[derive(Clone)]
pub struct Store {
    db: sled::Db,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// In-memory database that is discarded on drop.
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    pub fn open_tree(&self, name: &str) -> Result<Tree> {
        let tree = self.db.open_tree(name)?;
        Ok(Tree { inner: tree })
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

/// Opaque wrapper around a storage keyspace/tree.
#[derive(Clone)]
pub struct Tree {
    inner: sled::Tree,
}

impl Tree {
    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Result<Option<Vec<u8>>> {
        Ok(self.inner.get(key)?.map(|iv| iv.to_vec()))
    }

    pub fn insert<K: AsRef<[u8]>, V: AsRef<[u8]>>(&self, key: K, value: V) -> Result<()> {
        self.inner.insert(key, value.as_ref())?;
        Ok(())
    }

    /// Insert only if `key` is absent. Returns false when the key already existed.
    pub fn insert_if_absent<K: AsRef<[u8]>, V: AsRef<[u8]>>(&self, key: K, value: V) -> Result<bool> {
        let swapped = self
            .inner
            .compare_and_swap(key, None as Option<&[u8]>, Some(value.as_ref()))?;
        Ok(swapped.is_ok())
    }

    pub fn insert_encoded<K: AsRef<[u8]>, T: Serialize>(&self, key: K, value: &T) -> Result<()> {
        let bytes = bincode::serialize(value)?;
        self.insert(key, bytes)
    }

    pub fn get_decoded<K: AsRef<[u8]>, T: DeserializeOwned>(&self, key: K) -> Result<Option<T>> {
        match self.get(key)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn remove<K: AsRef<[u8]>>(&self, key: K) -> Result<Option<Vec<u8>>> {
        Ok(self.inner.remove(key)?.map(|iv| iv.to_vec()))
    }

    pub fn contains_key<K: AsRef<[u8]>>(&self, key: K) -> Result<bool> {
        Ok(self.inner.contains_key(key)?)
    }

    pub fn iter(&self) -> Iter {
        Iter {
            inner: self.inner.iter(),
        }
    }

    pub fn scan_prefix<P: AsRef<[u8]>>(&self, prefix: P) -> Iter {
        Iter {
            inner: self.inner.scan_prefix(prefix),
        }
    }

    pub fn last(&self) -> Result<Option<(Vec<u8>, Vec<u8>)>> {
        Ok(self.inner.last()?.map(|(k, v)| (k.to_vec(), v.to_vec())))
    }
}

pub struct Iter {
    inner: sled::Iter,
}

impl Iterator for Iter {
    type Item = Result<(Vec<u8>, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next() {
            Some(Ok((k, v))) => Some(Ok((k.to_vec(), v.to_vec()))),
            Some(Err(e)) => Some(Err(e.into())),
            None => None,
        }
    }
}

const SEQUENCES_TREE: &str = "id_sequences";

/// Monotonic id source for a tree keyed by big-endian u64 ids. Ids start at 1.
///
/// The last issued id is stored in the `id_sequences` tree, so an id freed by
/// a delete is never handed out again, including after a restart.
pub(crate) struct IdSequence {
    counters: Tree,
    name: String,
}

impl IdSequence {
    pub(crate) fn open(store: &Store, tree: &Tree, name: &str) -> Result<Self> {
        let counters = store.open_tree(SEQUENCES_TREE)?;
        let last_key = match tree.last()? {
            Some((key, _)) => decode_id(&key, 0),
            None => 0,
        };
        // Never behind the highest key already in the tree.
        counters.inner.fetch_and_update(name, |old| {
            let issued = old.map_or(0, |bytes| decode_id(bytes, 0));
            Some(issued.max(last_key).to_be_bytes().to_vec())
        })?;
        Ok(Self {
            counters,
            name: name.to_string(),
        })
    }

    pub(crate) fn next(&self) -> Result<u64> {
        let issued = self.counters.inner.update_and_fetch(&self.name, |old| {
            let last = old.map_or(0, |bytes| decode_id(bytes, 0));
            Some((last + 1).to_be_bytes().to_vec())
        })?;
        Ok(issued.map_or(1, |bytes| decode_id(&bytes, 0)))
    }
}

/// `parent ++ child` as big-endian bytes, so a prefix scan on `parent` lists children in id order.
pub(crate) fn compound_key(parent: u64, child: u64) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&parent.to_be_bytes());
    key[8..].copy_from_slice(&child.to_be_bytes());
    key
}

/// Read the big-endian u64 at `offset`; short keys decode as 0.
pub(crate) fn decode_id(key: &[u8], offset: usize) -> u64 {
    key.get(offset..offset + 8)
        .and_then(|slice| slice.try_into().ok())
        .map(u64::from_be_bytes)
        .unwrap_or(0)
}
