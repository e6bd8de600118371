use std::collections::HashMap;

use parking_lot::Mutex;

use super::KeyValueStore;

/// In-process store; contents are lost on exit
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one entry
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set() {
        let store = MemoryStore::new();
        assert_eq!(store.get("simCardNumber").unwrap(), None);

        store.set("simCardNumber", "123").unwrap();
        store.set("simCardNumber", "456").unwrap();
        assert_eq!(store.get("simCardNumber").unwrap().as_deref(), Some("456"));
    }

    #[test]
    fn test_with_entry() {
        let store = MemoryStore::with_entry("a", "b");
        assert_eq!(store.get("a").unwrap().as_deref(), Some("b"));
    }
}
