pub mod router;

#[cfg(test)]
pub(crate) mod fakes;

use crate::backend::{BackendClient, BackendError};
use crate::core::alarms::AlarmScheduler;
use crate::core::badge::{Badge, BADGE_COLOR};
use crate::core::models::{badge_text, new_job_count, NewCompany, ScanSummary};
use crate::core::notifications::{NotificationSpec, Notifier};
use crate::core::settings::{Settings, SettingsStore};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

pub use router::{Message, Reply};

pub const POLL_ALARM: &str = "poll";

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Could not create or find company")]
    CompanyNotFound,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// The background agent. Every entry point is an independent task; nothing
/// here serializes concurrent calls.
pub struct Agent {
    settings: Arc<dyn SettingsStore>,
    alarms: Arc<dyn AlarmScheduler>,
    badge: Arc<dyn Badge>,
    notifier: Arc<dyn Notifier>,
    http: reqwest::Client,
}

impl Agent {
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        alarms: Arc<dyn AlarmScheduler>,
        badge: Arc<dyn Badge>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            settings,
            alarms,
            badge,
            notifier,
            http: reqwest::Client::new(),
        }
    }

    pub async fn get_settings(&self) -> Settings {
        self.settings.get().await
    }

    fn backend(&self, settings: &Settings) -> BackendClient {
        BackendClient::new(self.http.clone(), settings.backend_url.clone())
    }

    /// Replaces the poll alarm. A non-positive interval leaves none.
    pub async fn setup_alarm(&self, interval_minutes: f64) {
        self.alarms.clear(POLL_ALARM).await;
        if interval_minutes > 0.0 {
            self.alarms.create(POLL_ALARM, interval_minutes).await;
        }
    }

    /// Best effort: any failure just blanks the badge.
    pub async fn update_badge(&self) {
        let settings = self.get_settings().await;
        match self.backend(&settings).new_jobs().await {
            Ok(body) => {
                let count = new_job_count(&body);
                self.badge.set_text(&badge_text(count)).await;
                self.badge.set_background_color(BADGE_COLOR).await;
                tracing::debug!(count, "Badge updated");
            }
            Err(e) => {
                tracing::debug!(error = %e, "Badge refresh failed");
                self.badge.set_text("").await;
            }
        }
    }

    pub async fn clear_badge(&self) {
        self.badge.set_text("").await;
    }

    pub async fn scan_now(&self) -> Result<Value, BackendError> {
        let settings = self.get_settings().await;
        self.backend(&settings).scan().await
    }

    pub async fn on_alarm(&self, name: &str) {
        if name != POLL_ALARM {
            return;
        }

        let data = match self.scan_now().await {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(error = %e, "JobGo poll failed");
                return;
            }
        };

        let summary = ScanSummary::from_value(&data);
        tracing::info!(new_jobs = summary.new_jobs, "Poll scan finished");
        if summary.new_jobs > 0.0 {
            let spec = NotificationSpec::new_jobs(summary.new_jobs);
            if let Err(e) = self.notifier.notify(&spec).await {
                tracing::warn!(error = %e, "Failed to send new jobs notification");
            }
        }

        self.update_badge().await;
    }

    /// Adds a company to the tracking cart, creating it first when needed.
    pub async fn add_to_jobgo(&self, request: &NewCompany) -> Result<Reply, AgentError> {
        let settings = self.get_settings().await;
        let backend = self.backend(&settings);

        let company = match backend.create_company(request).await? {
            Some(company) => company,
            None => backend
                .list_companies()
                .await?
                .into_iter()
                .find(|c| c.matches(&request.slug, &request.platform))
                .ok_or(AgentError::CompanyNotFound)?,
        };

        backend.add_to_cart(&company.id).await?;
        tracing::info!(company_id = %company.id, slug = %company.slug, "Company added to cart");
        Ok(Reply::ok())
    }

    /// First run: schedule polling from the stored interval and show the badge.
    pub async fn on_installed(&self) {
        let settings = self.get_settings().await;
        self.setup_alarm(settings.watch_interval).await;
        self.update_badge().await;
    }
}
