use crate::core::settings::{FileSettingsStore, Settings};
use anyhow::Result;

pub async fn show(json: bool) -> Result<()> {
    let store = FileSettingsStore::open_default()?;
    let settings = store.load().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    println!("Config file:    {}", store.path().display());
    println!("Backend URL:    {}", settings.backend_url);
    println!("Panel URL:      {}", settings.panel_url());
    println!("Minimum score:  {}", settings.min_score);
    if settings.watch_interval > 0.0 {
        println!("Watch interval: {} min", settings.watch_interval);
    } else {
        println!("Watch interval: disabled");
    }
    Ok(())
}

/// Saves the interval. A running daemon sees the file change and routes
/// `SETTINGS_CHANGED` itself, so nothing is sent over the bus.
pub async fn set_interval(minutes: f64) -> Result<()> {
    let store = FileSettingsStore::open_default()?;
    persist_interval(&store, minutes).await?;

    if minutes > 0.0 {
        println!("Watch interval set to {minutes} min");
    } else {
        println!("Polling disabled");
    }
    Ok(())
}

async fn persist_interval(store: &FileSettingsStore, minutes: f64) -> Result<Settings> {
    if !minutes.is_finite() || minutes < 0.0 {
        anyhow::bail!("Interval must be a non-negative number of minutes, got {minutes}");
    }

    let mut settings = store.load().await;
    settings.watch_interval = minutes;
    store.save(&settings).await?;
    Ok(settings)
}
