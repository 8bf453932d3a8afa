//! The keyspace: four independently-locked mappings (strings, hashes, sets,
//! lists) plus the typed operations client commands invoke.
//!
//! Each mapping has exactly one mutual-exclusion guard; all reads and writes
//! on a mapping take that guard, and the guards are not reentrant. This is
//! deliberately per-mapping rather than a single global lock: the dump
//! writer (see [`crate::dump::writer`]) needs to iterate one mapping at a
//! time without blocking unrelated command types, and no client operation
//! ever needs cross-mapping atomicity.

pub mod hashes;
pub mod lists;
pub mod sets;
pub mod strings;

use std::sync::Mutex;

pub use hashes::Hashes;
pub use lists::Lists;
pub use sets::Sets;
pub use strings::{StringError, Strings};

/// The full in-memory store. Cheaply clonable via `Arc<Keyspace>` at the
/// call sites that need to share it across threads (the acceptor loop and
/// the dump writer).
#[derive(Default)]
pub struct Keyspace {
    pub(crate) strings: Mutex<Strings>,
    pub(crate) hashes: Mutex<Hashes>,
    pub(crate) sets: Mutex<Sets>,
    pub(crate) lists: Mutex<Lists>,
}

impl Keyspace {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Strings ──────────────────────────────────────────────────────────

    pub fn set(&self, key: &[u8], value: Vec<u8>) {
        self.strings.lock().unwrap().set(key, value);
    }

    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.strings.lock().unwrap().get(key)
    }

    pub fn mget(&self, keys: &[Vec<u8>]) -> Vec<Option<Vec<u8>>> {
        self.strings.lock().unwrap().mget(keys)
    }

    pub fn incr(&self, key: &[u8]) -> Result<i64, StringError> {
        self.strings.lock().unwrap().incr(key)
    }

    pub fn incrby(&self, key: &[u8], delta: i64) -> Result<i64, StringError> {
        self.strings.lock().unwrap().incrby(key, delta)
    }

    // ── Hashes ───────────────────────────────────────────────────────────

    pub fn hset(&self, key: &[u8], field: &[u8], value: Vec<u8>) {
        self.hashes.lock().unwrap().hset(key, field, value);
    }

    pub fn hget(&self, key: &[u8], field: &[u8]) -> Option<Vec<u8>> {
        self.hashes.lock().unwrap().hget(key, field)
    }

    pub fn hgetall(&self, key: &[u8]) -> Option<Vec<(Vec<u8>, Vec<u8>)>> {
        self.hashes.lock().unwrap().hgetall(key)
    }

    // ── Sets ─────────────────────────────────────────────────────────────

    pub fn sadd(&self, key: &[u8], members: Vec<Vec<u8>>) -> usize {
        self.sets.lock().unwrap().sadd(key, members)
    }

    pub fn srem(&self, key: &[u8], members: &[Vec<u8>]) -> usize {
        self.sets.lock().unwrap().srem(key, members)
    }

    pub fn sismember(&self, key: &[u8], member: &[u8]) -> bool {
        self.sets.lock().unwrap().sismember(key, member)
    }

    pub fn scard(&self, key: &[u8]) -> usize {
        self.sets.lock().unwrap().scard(key)
    }

    // ── Lists ────────────────────────────────────────────────────────────

    pub fn rpush(&self, key: &[u8], values: Vec<Vec<u8>>) -> usize {
        self.lists.lock().unwrap().rpush(key, values)
    }

    pub fn lpush(&self, key: &[u8], values: Vec<Vec<u8>>) -> usize {
        self.lists.lock().unwrap().lpush(key, values)
    }

    pub fn lpop(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.lists.lock().unwrap().lpop(key)
    }

    pub fn rpop(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.lists.lock().unwrap().rpop(key)
    }

    pub fn llen(&self, key: &[u8]) -> usize {
        self.lists.lock().unwrap().llen(key)
    }

    pub fn lindex(&self, key: &[u8], index: i64) -> Option<Vec<u8>> {
        self.lists.lock().unwrap().lindex(key, index)
    }

    pub fn lrange(&self, key: &[u8], start: i64, stop: i64) -> Vec<Vec<u8>> {
        self.lists.lock().unwrap().lrange(key, start, stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mappings_are_independent_by_key_name() {
        let ks = Keyspace::new();
        ks.set(b"shared", b"string-value".to_vec());
        ks.sadd(b"shared", vec![b"member".to_vec()]);
        // Same name in two mappings is not checked, and not expected to collide.
        assert_eq!(ks.get(b"shared"), Some(b"string-value".to_vec()));
        assert_eq!(ks.scard(b"shared"), 1);
    }

    #[test]
    fn list_key_disappears_after_last_pop() {
        let ks = Keyspace::new();
        ks.rpush(b"l", vec![b"a".to_vec()]);
        assert_eq!(ks.llen(b"l"), 1);
        ks.rpop(b"l");
        assert_eq!(ks.llen(b"l"), 0);
    }
}
