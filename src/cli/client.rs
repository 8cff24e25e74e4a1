use crate::agent::{Message, Reply};
use crate::daemon::{DBUS_NAME, DBUS_PATH};
use anyhow::{Context, Result};

/// Sends one message to the running daemon and returns its reply, if any.
pub async fn send(message: &Message) -> Result<Option<Reply>> {
    let payload = serde_json::to_string(message).context("Failed to encode message")?;

    let connection = zbus::Connection::session()
        .await
        .context("Failed to connect to session D-Bus")?;

    let raw: String = connection
        .call_method(
            Some(DBUS_NAME),
            DBUS_PATH,
            Some(DBUS_NAME),
            "Dispatch",
            &(payload,),
        )
        .await
        .context("Failed to call Dispatch method - is the daemon running?")?
        .body()
        .deserialize()
        .context("Failed to deserialize response")?;

    parse_reply(&raw)
}

/// Sends a message that must be answered, turning `{ok: false}` into an error.
pub async fn request(message: &Message) -> Result<Reply> {
    let reply = send(message)
        .await?
        .context("Daemon sent no reply")?;
    check(reply)
}

pub fn parse_reply(raw: &str) -> Result<Option<Reply>> {
    if raw.is_empty() {
        return Ok(None);
    }
    let reply = serde_json::from_str(raw).context("Daemon sent an invalid reply")?;
    Ok(Some(reply))
}

pub fn check(reply: Reply) -> Result<Reply> {
    if reply.ok {
        return Ok(reply);
    }
    let error = reply.error.unwrap_or_else(|| "unknown error".to_string());
    anyhow::bail!("{error}")
}
