//! Client-local key-value persistence port.

/// Whole-value string store keyed by fixed names.
///
/// Values are JSON documents. There is no partial update: callers read the
/// full value, modify it and write it back.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn read(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. A failed write must leave the
    /// previous value in place.
    fn write(&self, key: &str, value: &str) -> anyhow::Result<()>;
}
