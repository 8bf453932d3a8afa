//! Unordered sets of byte strings.

use std::collections::{HashMap, HashSet};

#[derive(Default)]
pub struct Sets {
    map: HashMap<Vec<u8>, HashSet<Vec<u8>>>,
}

impl Sets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `members`, creating the set if absent. Returns the count of
    /// members that were not already present.
    pub fn sadd(&mut self, key: &[u8], members: impl IntoIterator<Item = Vec<u8>>) -> usize {
        let set = self.map.entry(key.to_vec()).or_default();
        let mut added = 0;
        for m in members {
            if set.insert(m) {
                added += 1;
            }
        }
        added
    }

    /// Removes `members`. Returns the count actually removed.
    pub fn srem(&mut self, key: &[u8], members: &[Vec<u8>]) -> usize {
        let Some(set) = self.map.get_mut(key) else {
            return 0;
        };
        members.iter().filter(|m| set.remove(m.as_slice())).count()
    }

    pub fn sismember(&self, key: &[u8], member: &[u8]) -> bool {
        self.map.get(key).map(|s| s.contains(member)).unwrap_or(false)
    }

    pub fn scard(&self, key: &[u8]) -> usize {
        self.map.get(key).map(|s| s.len()).unwrap_or(0)
    }

    /// Iterates every (key, members) pair. Used by the dump writer; unlike
    /// lists, an empty set MAY remain present (`srem` never deletes the map
    /// entry), so this can yield an empty member vector — the writer is the
    /// one that skips those rather than emitting a zero-member entry.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], Vec<&[u8]>)> {
        self.map
            .iter()
            .map(|(k, members)| (k.as_slice(), members.iter().map(|m| m.as_slice()).collect()))
    }

    /// Inserts a fully-formed set during snapshot/journal recovery.
    pub fn insert_members(&mut self, key: &[u8], members: Vec<Vec<u8>>) {
        self.map.entry(key.to_vec()).or_default().extend(members);
    }
}
