use anyhow::{Context, Result};
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;

const DEBOUNCE: Duration = Duration::from_millis(200);

/// Watches the settings file and emits one event per burst of writes.
pub struct SettingsWatcher {
    _watcher: RecommendedWatcher,
}

impl SettingsWatcher {
    pub fn start(path: &Path) -> Result<(Self, mpsc::UnboundedReceiver<()>)> {
        let parent = path
            .parent()
            .map(Path::to_path_buf)
            .context("Config path has no parent directory")?;
        let filename = path
            .file_name()
            .map(|f| f.to_os_string())
            .context("Config path has no file name")?;

        std::fs::create_dir_all(&parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;

        let (notify_tx, mut notify_rx) = mpsc::unbounded_channel::<()>();
        let (async_tx, async_rx) = mpsc::unbounded_channel::<()>();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| {
                let Ok(event) = res else {
                    return;
                };
                if !(event.kind.is_modify() || event.kind.is_create()) {
                    return;
                }
                if event
                    .paths
                    .iter()
                    .any(|p| is_settings_file(p, &filename))
                {
                    let _ = notify_tx.send(());
                }
            },
            Config::default(),
        )?;

        watcher
            .watch(&parent, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch directory: {}", parent.display()))?;
        tracing::info!(?parent, "Watching settings directory");

        tokio::spawn(async move {
            while notify_rx.recv().await.is_some() {
                tokio::time::sleep(DEBOUNCE).await;
                while notify_rx.try_recv().is_ok() {}

                tracing::info!("Settings file changed on disk");
                if async_tx.send(()).is_err() {
                    break;
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

fn is_settings_file(path: &Path, filename: &OsStr) -> bool {
    path.file_name() == Some(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_settings_file() {
        let name = OsStr::new("config.toml");
        assert!(is_settings_file(
            Path::new("/home/u/.config/jobgo-bar/config.toml"),
            name
        ));
        assert!(!is_settings_file(
            Path::new("/home/u/.config/jobgo-bar/config.toml.swp"),
            name
        ));
    }

    #[tokio::test]
    async fn test_write_emits_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let (_watcher, mut rx) = SettingsWatcher::start(&path).unwrap();

        std::fs::write(&path, "watch_interval = 5").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await;
        assert!(matches!(event, Ok(Some(()))));
    }
}
