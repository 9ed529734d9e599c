use std::collections::HashMap;

use firmament_types::Id;

use crate::ShaderProgram;

/// Result of a program release
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Release {
    /// Program is still used by this many owners
    Retained(u32),
    /// Last owner released the program, backend resources may be freed
    Dropped,
    /// Program is not known to the cache
    Unknown,
}

struct Entry {
    id: Id<ShaderProgram>,
    owners: u32,
}

/// Reference counted shader programs keyed by their sources
///
/// Primitives asking for the same pair of sources share one compiled program.
#[derive(Default)]
pub struct ShaderCache {
    programs: HashMap<(String, String), Entry>,
    keys: HashMap<Id<ShaderProgram>, (String, String)>,
}

impl ShaderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns cached program for the sources adding an owner to it
    pub fn acquire(&mut self, vertex: &str, fragment: &str) -> Option<Id<ShaderProgram>> {
        let key = (String::from(vertex), String::from(fragment));
        self.programs.get_mut(&key).map(|entry| {
            entry.owners += 1;
            entry.id
        })
    }

    /// Caches a freshly compiled program with a single owner
    pub fn insert(&mut self, vertex: &str, fragment: &str, id: Id<ShaderProgram>) {
        let key = (String::from(vertex), String::from(fragment));
        self.keys.insert(id, key.clone());
        self.programs.insert(key, Entry { id, owners: 1 });
    }

    /// Removes an owner from the program
    pub fn release(&mut self, id: Id<ShaderProgram>) -> Release {
        let key = match self.keys.get(&id) {
            Some(key) => key,
            None => return Release::Unknown,
        };

        let owners = match self.programs.get_mut(key) {
            Some(entry) => {
                entry.owners -= 1;
                entry.owners
            }
            None => return Release::Unknown,
        };

        if owners > 0 {
            return Release::Retained(owners);
        }

        if let Some(key) = self.keys.remove(&id) {
            self.programs.remove(&key);
        }
        Release::Dropped
    }

    /// Number of cached programs
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_sources_share_program() {
        let mut cache = ShaderCache::new();
        assert_eq!(cache.acquire("vs", "fs"), None);

        let id = Id::new(7, 0);
        cache.insert("vs", "fs", id);
        assert_eq!(cache.acquire("vs", "fs"), Some(id));
        assert_eq!(cache.acquire("vs", "other"), None);
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.release(id), Release::Retained(1));
        assert_eq!(cache.release(id), Release::Dropped);
        assert!(cache.is_empty());
        assert_eq!(cache.release(id), Release::Unknown);
        assert_eq!(cache.acquire("vs", "fs"), None);
    }
}
