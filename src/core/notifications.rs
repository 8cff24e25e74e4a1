use anyhow::{Context, Result};
use async_trait::async_trait;
use notify_rust::Notification;

pub const NEW_JOBS_TITLE: &str = "JobGo - New Jobs Found";
const NOTIFICATION_ICON: &str = "mail-message-new";
const APP_NAME: &str = "jobgo-bar";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationSpec {
    pub title: String,
    pub message: String,
    pub icon: String,
}

impl NotificationSpec {
    pub fn new_jobs(count: f64) -> Self {
        Self {
            title: NEW_JOBS_TITLE.to_string(),
            message: format!("{count} new job(s) matched your profile"),
            icon: NOTIFICATION_ICON.to_string(),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, spec: &NotificationSpec) -> Result<()>;
}

/// Sends freedesktop notifications over the session bus.
pub struct DesktopNotifier;

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, spec: &NotificationSpec) -> Result<()> {
        let spec = spec.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            Notification::new()
                .summary(&spec.title)
                .body(&spec.message)
                .icon(&spec.icon)
                .appname(APP_NAME)
                .timeout(notify_rust::Timeout::Milliseconds(5000))
                .show()
                .map(|_| ())
                .context("Failed to show notification")?;

            tracing::info!(title = %spec.title, message = %spec.message, "Sent notification");
            Ok(())
        })
        .await
        .context("Notification task panicked")?
    }
}
