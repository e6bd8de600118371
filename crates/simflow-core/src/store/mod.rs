//! Key-value persistence capability for the last-used card identifier.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key under which the last successfully queried card is kept
pub const CARD_NUMBER_KEY: &str = "simCardNumber";

/// String key-value store injected into the query state machine
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key was never set
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}
