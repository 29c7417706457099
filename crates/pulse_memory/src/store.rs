//! Local persistence: one JSON document per user.

use anyhow::{Context, Result};
use async_trait::async_trait;
use pulse_core::UserMemory;
use std::path::{Path, PathBuf};

/// Durable get/put contract for per-user memory.
///
/// `load` must always produce a usable memory (fresh on first contact);
/// `save` may fail, and callers treat persistence as best-effort.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    async fn load(&self, user: &str) -> Result<UserMemory>;
    async fn save(&self, user: &str, memory: &UserMemory) -> Result<()>;
}

/// File-backed store writing `pulse_memory_<user>.json` documents under a
/// configured directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// User ids become filenames, so anything outside `[A-Za-z0-9_-]` maps
    /// to `_`. Blank ids collapse to "default".
    fn sanitize_user(user: &str) -> String {
        let trimmed = user.trim();
        if trimmed.is_empty() {
            return "default".to_string();
        }
        trimmed
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    fn memory_path(&self, user: &str) -> PathBuf {
        self.dir
            .join(format!("pulse_memory_{}.json", Self::sanitize_user(user)))
    }
}

#[async_trait]
impl MemoryStore for FileStore {
    async fn load(&self, user: &str) -> Result<UserMemory> {
        let path = self.memory_path(user);
        match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(memory) => Ok(memory),
                Err(e) => {
                    tracing::warn!(
                        "Corrupt memory document at {}, starting fresh: {}",
                        path.display(),
                        e
                    );
                    Ok(UserMemory::new(user))
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(UserMemory::new(user)),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    async fn save(&self, user: &str, memory: &UserMemory) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create storage dir {}", self.dir.display()))?;
        let path = self.memory_path(user);
        let json = serde_json::to_vec_pretty(memory).context("Failed to serialize memory")?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}
