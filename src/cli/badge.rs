use crate::agent::Message;
use crate::cli::client;
use anyhow::Result;

pub async fn run() -> Result<()> {
    client::send(&Message::ClearBadge).await?;
    println!("Badge cleared");
    Ok(())
}
