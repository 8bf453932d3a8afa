//! Byte-string values, with integer interpretation for `incr`/`incrby`.

use std::collections::HashMap;

/// Errors from string-typed operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringError {
    /// `incr`/`incrby` on a key that doesn't exist.
    NoSuchKey,
    /// `incr`/`incrby` on a value that doesn't parse as a base-10 integer.
    NotAnInteger,
}

impl std::fmt::Display for StringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StringError::NoSuchKey => write!(f, "no such key"),
            StringError::NotAnInteger => write!(f, "value is not an integer"),
        }
    }
}

impl std::error::Error for StringError {}

#[derive(Default)]
pub struct Strings {
    map: HashMap<Vec<u8>, Vec<u8>>,
}

impl Strings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &[u8], value: Vec<u8>) {
        self.map.insert(key.to_vec(), value);
    }

    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.map.get(key).cloned()
    }

    pub fn mget(&self, keys: &[Vec<u8>]) -> Vec<Option<Vec<u8>>> {
        keys.iter().map(|k| self.map.get(k.as_slice()).cloned()).collect()
    }

    pub fn incrby(&mut self, key: &[u8], delta: i64) -> Result<i64, StringError> {
        let current = self.map.get(key).ok_or(StringError::NoSuchKey)?;
        let text = std::str::from_utf8(current).map_err(|_| StringError::NotAnInteger)?;
        let n: i64 = text.parse().map_err(|_| StringError::NotAnInteger)?;
        let next = n.checked_add(delta).ok_or(StringError::NotAnInteger)?;
        self.map.insert(key.to_vec(), next.to_string().into_bytes());
        Ok(next)
    }

    pub fn incr(&mut self, key: &[u8]) -> Result<i64, StringError> {
        self.incrby(key, 1)
    }

    /// Iterates every (key, value) pair. Used by the dump writer.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.map.iter().map(|(k, v)| (k.as_slice(), v.as_slice()))
    }
}
