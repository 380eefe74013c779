//! Filesystem key-value store.
//!
//! Each key is one `<key>.json` file inside the data directory. Writes land in
//! a temporary file next to the target and are renamed over it, so a failed
//! write never leaves a truncated collection behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glowtrack_core::KeyValueStore;
use tempfile::NamedTempFile;
use tracing::debug;

/// Returns the default data directory.
///
/// Uses `XDG_DATA_HOME/glowtrack` or `~/.local/share/glowtrack`.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("glowtrack")
}

/// `KeyValueStore` backed by JSON files in a directory.
#[derive(Debug, Clone)]
pub struct FsKeyValueStore {
    dir: PathBuf,
}

impl FsKeyValueStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            anyhow::bail!("Invalid store key '{key}'");
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FsKeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let value = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(value))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create data directory {}", self.dir.display()))?;

        let mut tmp = NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("Failed to create temporary file in {}", self.dir.display()))?;
        tmp.write_all(value.as_bytes())
            .context("Failed to write temporary file")?;
        tmp.as_file()
            .sync_all()
            .context("Failed to flush temporary file")?;
        tmp.persist(&path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}
