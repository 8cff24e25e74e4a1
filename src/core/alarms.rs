use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

#[derive(Debug, Clone, PartialEq)]
pub struct Alarm {
    pub name: String,
    pub period_in_minutes: f64,
    pub scheduled_time: DateTime<Utc>,
}

/// Named recurring timers.
#[async_trait]
pub trait AlarmScheduler: Send + Sync {
    /// Starts a timer firing every `period_minutes`, replacing any timer with the same name.
    async fn create(&self, name: &str, period_minutes: f64);
    /// Returns whether a timer was removed.
    async fn clear(&self, name: &str) -> bool;
    async fn get(&self, name: &str) -> Option<Alarm>;
}

struct Entry {
    alarm: Alarm,
    task: JoinHandle<()>,
}

type Entries = Arc<Mutex<HashMap<String, Entry>>>;

/// Tokio-backed alarms. Fired alarm names arrive on the receiver returned by [`AlarmRegistry::new`].
///
/// Missed ticks are skipped rather than replayed, so a suspended machine gets
/// one fire on wake-up instead of a burst.
pub struct AlarmRegistry {
    entries: Entries,
    fired_tx: mpsc::UnboundedSender<String>,
}

impl AlarmRegistry {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        let registry = Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            fired_tx,
        };
        (registry, fired_rx)
    }

    #[cfg(test)]
    pub async fn all(&self) -> Vec<Alarm> {
        let entries = self.entries.lock().await;
        let mut alarms: Vec<Alarm> = entries.values().map(|e| e.alarm.clone()).collect();
        alarms.sort_by(|a, b| a.name.cmp(&b.name));
        alarms
    }
}

fn scheduled_after(period: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(period)
        .ok()
        .and_then(|d| Utc::now().checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[async_trait]
impl AlarmScheduler for AlarmRegistry {
    async fn create(&self, name: &str, period_minutes: f64) {
        let period = match Duration::try_from_secs_f64(period_minutes * 60.0) {
            Ok(period) if !period.is_zero() => period,
            _ => {
                tracing::warn!(name, period_minutes, "Ignoring alarm with invalid period");
                return;
            }
        };
        let Some(start) = Instant::now().checked_add(period) else {
            tracing::warn!(name, period_minutes, "Ignoring alarm with out-of-range period");
            return;
        };

        let mut entries = self.entries.lock().await;

        let task_name = name.to_string();
        let task_entries = Arc::clone(&self.entries);
        let fired_tx = self.fired_tx.clone();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;

                if let Some(entry) = task_entries.lock().await.get_mut(&task_name) {
                    entry.alarm.scheduled_time = scheduled_after(period);
                }

                tracing::debug!(name = %task_name, "Alarm fired");
                if fired_tx.send(task_name.clone()).is_err() {
                    break;
                }
            }
        });

        let alarm = Alarm {
            name: name.to_string(),
            period_in_minutes: period_minutes,
            scheduled_time: scheduled_after(period),
        };
        if let Some(previous) = entries.insert(name.to_string(), Entry { alarm, task }) {
            previous.task.abort();
        }

        tracing::info!(name, period_minutes, "Alarm created");
    }

    async fn clear(&self, name: &str) -> bool {
        match self.entries.lock().await.remove(name) {
            Some(entry) => {
                entry.task.abort();
                tracing::info!(name, "Alarm cleared");
                true
            }
            None => false,
        }
    }

    async fn get(&self, name: &str) -> Option<Alarm> {
        self.entries.lock().await.get(name).map(|e| e.alarm.clone())
    }
}

impl Drop for AlarmRegistry {
    fn drop(&mut self) {
        if let Ok(entries) = self.entries.try_lock() {
            for entry in entries.values() {
                entry.task.abort();
            }
        }
    }
}
