use super::Agent;
use crate::core::alarms::AlarmRegistry;
use crate::core::badge::Badge;
use crate::core::notifications::{NotificationSpec, Notifier};
use crate::core::settings::{Settings, SettingsStore};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use wiremock::MockServer;

#[derive(Default)]
pub struct MemorySettings {
    settings: Mutex<Settings>,
}

impl MemorySettings {
    pub fn update(&self, f: impl FnOnce(&mut Settings)) {
        f(&mut self.settings.lock().unwrap());
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn get(&self) -> Settings {
        self.settings.lock().unwrap().clone()
    }
}

#[derive(Default)]
pub struct RecordingBadge {
    text: Mutex<String>,
    color: Mutex<Option<String>>,
}

impl RecordingBadge {
    pub fn preset(&self, text: &str) {
        *self.text.lock().unwrap() = text.to_string();
    }

    pub fn text(&self) -> String {
        self.text.lock().unwrap().clone()
    }

    pub fn color(&self) -> Option<String> {
        self.color.lock().unwrap().clone()
    }
}

#[async_trait]
impl Badge for RecordingBadge {
    async fn set_text(&self, text: &str) {
        *self.text.lock().unwrap() = text.to_string();
    }

    async fn set_background_color(&self, color: &str) {
        *self.color.lock().unwrap() = Some(color.to_string());
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<NotificationSpec>>,
    fail_next: AtomicBool,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<NotificationSpec> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, spec: &NotificationSpec) -> anyhow::Result<()> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            anyhow::bail!("notification daemon unavailable");
        }
        self.sent.lock().unwrap().push(spec.clone());
        Ok(())
    }
}

pub struct TestHost {
    pub settings: Arc<MemorySettings>,
    pub alarms: Arc<AlarmRegistry>,
    pub badge: Arc<RecordingBadge>,
    pub notifier: Arc<RecordingNotifier>,
    _fired: mpsc::UnboundedReceiver<String>,
}

impl TestHost {
    pub fn empty() -> Self {
        let (alarms, fired) = AlarmRegistry::new();
        Self {
            settings: Arc::new(MemorySettings::default()),
            alarms: Arc::new(alarms),
            badge: Arc::new(RecordingBadge::default()),
            notifier: Arc::new(RecordingNotifier::default()),
            _fired: fired,
        }
    }

    pub fn with_backend_url(url: &str) -> Self {
        let host = Self::empty();
        host.settings.update(|s| s.backend_url = url.to_string());
        host
    }

    pub fn with_backend(server: &MockServer) -> Self {
        Self::with_backend_url(&format!("{}/api", server.uri()))
    }
}

pub fn agent_with(host: &TestHost) -> Agent {
    Agent::new(
        host.settings.clone(),
        host.alarms.clone(),
        host.badge.clone(),
        host.notifier.clone(),
    )
}
