//! File-backed durable storage for the auth token.
//!
//! The file is a flat JSON object; the token lives under the fixed key
//! [`AUTH_TOKEN_KEY`]. No other state is persisted.

use crate::paths::HostdeskPaths;
use hostdesk_core::session::{TokenStore, AUTH_TOKEN_KEY};
use hostdesk_core::{HostdeskError, Result};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

/// Persists the auth token to `session.json`.
///
/// # Security Note
///
/// The token is stored in plaintext. On Unix the file is written with mode
/// 600.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(paths: &HostdeskPaths) -> Result<Self> {
        let path = paths
            .token_file()
            .map_err(|e| HostdeskError::storage(format!("Failed to get token path: {}", e)))?;
        Ok(Self { path })
    }

    /// Creates a store at a custom path (config override or tests).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Reads the stored entries. A file that is not a JSON object is treated
    /// as empty and replaced on the next write.
    async fn read_entries(&self) -> Result<Map<String, Value>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => {
                tracing::warn!(
                    "[TokenStore] Ignoring {:?}: not a JSON object",
                    self.path
                );
                Ok(Map::new())
            }
            Err(e) => {
                tracing::warn!("[TokenStore] Ignoring unreadable {:?}: {}", self.path, e);
                Ok(Map::new())
            }
        }
    }

    /// Writes through a private temp file renamed over the target, so the
    /// token is never on disk with wider permissions.
    async fn write_entries(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(entries)?;

        let tmp_path = self.path.with_extension("json.tmp");
        match tokio::fs::remove_file(&tmp_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&tmp_path).await?;
        file.write_all(content.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<String>> {
        let entries = self.read_entries().await?;
        Ok(entries
            .get(AUTH_TOKEN_KEY)
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string))
    }

    async fn save(&self, token: &str) -> Result<()> {
        let mut entries = self.read_entries().await?;
        entries.insert(AUTH_TOKEN_KEY.to_string(), Value::String(token.to_string()));
        self.write_entries(&entries).await?;
        tracing::debug!("[TokenStore] Token saved to {:?}", self.path);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut entries = self.read_entries().await?;
        entries.remove(AUTH_TOKEN_KEY);
        if entries.is_empty() {
            match tokio::fs::remove_file(&self.path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        } else {
            self.write_entries(&entries).await?;
        }
        tracing::debug!("[TokenStore] Token cleared from {:?}", self.path);
        Ok(())
    }
}
