use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_MIN_SCORE: f64 = 0.0;
pub const DEFAULT_WATCH_INTERVAL: f64 = 2880.0;

const CONFIG_PATH_ENV: &str = "JOBGO_BAR_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backend_url: String,
    pub min_score: f64,
    /// Poll period in minutes; 0 disables polling.
    pub watch_interval: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panel_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            min_score: DEFAULT_MIN_SCORE,
            watch_interval: DEFAULT_WATCH_INTERVAL,
            panel_url: None,
        }
    }
}

impl Settings {
    /// Page opened from the tray. Falls back to the backend URL without its `/api` suffix.
    pub fn panel_url(&self) -> String {
        if let Some(url) = &self.panel_url {
            return url.clone();
        }
        let base = self.backend_url.trim_end_matches('/');
        base.strip_suffix("/api").unwrap_or(base).to_string()
    }
}

/// Persisted key-value settings, read with defaults filled in.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self) -> Settings;
}

pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|p| p.join("jobgo-bar").join("config.toml"))
    }

    pub fn open_default() -> Result<Self> {
        let path = Self::config_path().context("Could not determine config directory")?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Settings {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = ?self.path, "Config file not found, using defaults");
                return Settings::default();
            }
            Err(e) => {
                tracing::warn!(path = ?self.path, error = %e, "Failed to read config, using defaults");
                return Settings::default();
            }
        };

        match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = ?self.path, error = %e, "Failed to parse config, using defaults");
                Settings::default()
            }
        }
    }

    pub async fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        tokio::fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write config file: {}", self.path.display()))?;

        tracing::info!(path = ?self.path, "Saved config");
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn get(&self) -> Settings {
        self.load().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.backend_url, "http://localhost:8080/api");
        assert_eq!(settings.min_score, 0.0);
        assert_eq!(settings.watch_interval, 2880.0);
        assert!(settings.panel_url.is_none());
    }

    #[test]
    fn test_partial_toml_merges_over_defaults() {
        let settings: Settings = toml::from_str("watch_interval = 30").unwrap();
        assert_eq!(settings.watch_interval, 30.0);
        assert_eq!(settings.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(settings.min_score, DEFAULT_MIN_SCORE);
    }

    #[test]
    fn test_panel_url_derived_from_backend() {
        let mut settings = Settings::default();
        assert_eq!(settings.panel_url(), "http://localhost:8080");

        settings.backend_url = "https://jobs.example.com/".to_string();
        assert_eq!(settings.panel_url(), "https://jobs.example.com");

        settings.panel_url = Some("https://jobs.example.com/ui".to_string());
        assert_eq!(settings.panel_url(), "https://jobs.example.com/ui");
    }

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("config.toml"));
        assert_eq!(store.get().await, Settings::default());
    }

    #[tokio::test]
    async fn test_unparsable_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "watch_interval = \"soon\"").unwrap();

        let store = FileSettingsStore::new(path);
        assert_eq!(store.get().await, Settings::default());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("nested").join("config.toml"));

        let settings = Settings {
            backend_url: "http://10.0.0.2:9000/api".to_string(),
            min_score: 0.7,
            watch_interval: 0.0,
            panel_url: None,
        };
        store.save(&settings).await.unwrap();

        assert_eq!(store.get().await, settings);
    }
}
