mod app;
mod dbus;
mod tray;

use anyhow::Result;

pub const DBUS_NAME: &str = "io.github.jobgo.Bar";
pub const DBUS_PATH: &str = "/io/github/jobgo/Bar";

pub async fn run() -> Result<()> {
    tracing::info!("Starting jobgo-bar daemon");
    app::run().await
}
