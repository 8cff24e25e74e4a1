use crate::agent::Message;
use crate::cli::client;
use crate::core::models::ScanSummary;
use anyhow::Result;
use serde_json::Value;

pub async fn run(json: bool) -> Result<()> {
    let reply = client::request(&Message::ScanNow).await?;
    let data = reply.data.unwrap_or(Value::Null);

    if json {
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        let summary = ScanSummary::from_value(&data);
        println!("Scan finished: {} new job(s)", summary.new_jobs);
    }

    Ok(())
}
