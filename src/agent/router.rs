use super::Agent;
use crate::core::models::NewCompany;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Requests from the client surfaces (CLI, tray menu, settings watcher).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    SettingsChanged {
        #[serde(default, rename = "watchInterval", deserialize_with = "null_as_zero")]
        watch_interval: f64,
    },
    ScanNow,
    ClearBadge,
    #[serde(rename = "ADD_TO_JOBGO")]
    AddToJobgo(NewCompany),
}

/// A `null` interval (what a cleared number field serializes to) disables polling.
fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

impl Message {
    /// Unknown `type` tags and malformed payloads yield `None`; they are dropped without a reply.
    pub fn parse(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unrecognized message");
                None
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Reply {
    pub fn ok() -> Self {
        Self {
            ok: true,
            data: None,
            error: None,
        }
    }

    pub fn with_data(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

impl Agent {
    /// Routes one message. `None` means the sender gets no response.
    pub async fn handle_message(&self, message: Message) -> Option<Reply> {
        match message {
            Message::SettingsChanged { watch_interval } => {
                tracing::info!(watch_interval, "Settings changed");
                self.setup_alarm(watch_interval).await;
                self.update_badge().await;
                Some(Reply::ok())
            }
            Message::ScanNow => Some(match self.scan_now().await {
                Ok(data) => Reply::with_data(data),
                Err(e) => {
                    tracing::warn!(error = %e, "Manual scan failed");
                    Reply::failed(e.to_string())
                }
            }),
            Message::ClearBadge => {
                self.clear_badge().await;
                None
            }
            Message::AddToJobgo(request) => Some(match self.add_to_jobgo(&request).await {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::warn!(error = %e, slug = %request.slug, "Add to JobGo failed");
                    Reply::failed(e.to_string())
                }
            }),
        }
    }

    /// Parses and routes a raw JSON message.
    pub async fn handle_raw(&self, raw: &str) -> Option<Reply> {
        let message = Message::parse(raw)?;
        self.handle_message(message).await
    }
}
