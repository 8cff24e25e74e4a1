use crate::agent::Reply;
use anyhow::{Context, Result};
use tokio::sync::{mpsc, oneshot};
use zbus::interface;

use super::{DBUS_NAME, DBUS_PATH};

/// A raw message from a bus client and the slot for its reply.
#[derive(Debug)]
pub struct DbusRequest {
    pub message: String,
    pub respond_to: oneshot::Sender<Option<Reply>>,
}

pub struct JobgoBarService {
    requests: mpsc::UnboundedSender<DbusRequest>,
}

impl JobgoBarService {
    pub fn new(requests: mpsc::UnboundedSender<DbusRequest>) -> Self {
        Self { requests }
    }
}

#[interface(name = "io.github.jobgo.Bar")]
impl JobgoBarService {
    /// Routes one JSON message. Returns the reply JSON, or an empty string
    /// when the message gets no response.
    async fn dispatch(&self, message: String) -> zbus::fdo::Result<String> {
        let (respond_to, reply_rx) = oneshot::channel();
        self.requests
            .send(DbusRequest {
                message,
                respond_to,
            })
            .map_err(|_| zbus::fdo::Error::Failed("Daemon is shutting down".to_string()))?;

        let reply = reply_rx
            .await
            .map_err(|_| zbus::fdo::Error::Failed("Message handler dropped".to_string()))?;

        match reply {
            Some(reply) => serde_json::to_string(&reply)
                .map_err(|e| zbus::fdo::Error::Failed(format!("Failed to encode reply: {e}"))),
            None => Ok(String::new()),
        }
    }
}

pub async fn start_dbus_server(
    requests: mpsc::UnboundedSender<DbusRequest>,
) -> Result<zbus::Connection> {
    let connection = zbus::connection::Builder::session()
        .context("Failed to connect to session D-Bus")?
        .name(DBUS_NAME)
        .context("Invalid D-Bus name")?
        .serve_at(DBUS_PATH, JobgoBarService::new(requests))
        .context("Invalid D-Bus object path")?
        .build()
        .await
        .with_context(|| format!("Failed to register {DBUS_NAME} - is another daemon running?"))?;

    tracing::info!(name = DBUS_NAME, path = DBUS_PATH, "D-Bus service registered");
    Ok(connection)
}
