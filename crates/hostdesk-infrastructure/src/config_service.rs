//! Configuration service implementation.
//!
//! Loads `HostdeskConfig` from `config.toml` in the hostdesk config directory,
//! then applies environment overrides.

use crate::paths::HostdeskPaths;
use hostdesk_core::{HostdeskConfig, HostdeskError, Result};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

pub const ENV_API_URL: &str = "HOSTDESK_API_URL";
pub const ENV_POLL_INTERVAL_SECS: &str = "HOSTDESK_POLL_INTERVAL_SECS";

/// Configuration service that loads and caches the client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<HostdeskConfig>>>,
}

impl ConfigService {
    pub fn new(paths: &HostdeskPaths) -> Result<Self> {
        let path = paths
            .config_file()
            .map_err(|e| HostdeskError::config(format!("Failed to get config path: {}", e)))?;
        Ok(Self::with_path(path))
    }

    /// Creates a ConfigService reading a specific file (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<HostdeskConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = self.load_or_create()?;
        apply_overrides(&mut loaded, |name| std::env::var(name).ok())?;

        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(loaded.clone());

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    fn load_or_create(&self) -> Result<HostdeskConfig> {
        if !self.path.exists() {
            let default_config = HostdeskConfig::default();
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&self.path, toml::to_string_pretty(&default_config)?)?;
            tracing::info!("[ConfigService] Created default config at {:?}", self.path);
            return Ok(default_config);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let config: HostdeskConfig = toml::from_str(&content)?;
        tracing::debug!("[ConfigService] Loaded config from {:?}", self.path);
        Ok(config)
    }
}

/// Environment variables take priority over the file.
pub fn apply_overrides<F>(config: &mut HostdeskConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
        config.api_base_url = url;
    }

    if let Some(raw) = lookup(ENV_POLL_INTERVAL_SECS) {
        config.poll_interval_secs = raw.trim().parse().map_err(|_| {
            HostdeskError::config(format!("{} must be a number of seconds, got '{}'", ENV_POLL_INTERVAL_SECS, raw))
        })?;
    }

    Ok(())
}
