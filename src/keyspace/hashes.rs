//! Hash values: field → value maps with unique fields per hash.

use std::collections::HashMap;

#[derive(Default)]
pub struct Hashes {
    map: HashMap<Vec<u8>, HashMap<Vec<u8>, Vec<u8>>>,
}

impl Hashes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hset(&mut self, key: &[u8], field: &[u8], value: Vec<u8>) {
        self.map
            .entry(key.to_vec())
            .or_default()
            .insert(field.to_vec(), value);
    }

    pub fn hget(&self, key: &[u8], field: &[u8]) -> Option<Vec<u8>> {
        self.map.get(key)?.get(field).cloned()
    }

    /// All (field, value) pairs for `key`, in unspecified order. `None` if
    /// the hash doesn't exist.
    pub fn hgetall(&self, key: &[u8]) -> Option<Vec<(Vec<u8>, Vec<u8>)>> {
        let fields = self.map.get(key)?;
        Some(fields.iter().map(|(f, v)| (f.clone(), v.clone())).collect())
    }

    /// Iterates every (key, [(field, value), ...]) pair. Used by the dump writer.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], Vec<(&[u8], &[u8])>)> {
        self.map.iter().map(|(k, fields)| {
            (
                k.as_slice(),
                fields.iter().map(|(f, v)| (f.as_slice(), v.as_slice())).collect(),
            )
        })
    }

    /// Inserts a fully-formed hash during snapshot/journal recovery.
    pub fn insert_fields(&mut self, key: &[u8], fields: Vec<(Vec<u8>, Vec<u8>)>) {
        let entry = self.map.entry(key.to_vec()).or_default();
        for (f, v) in fields {
            entry.insert(f, v);
        }
    }
}
