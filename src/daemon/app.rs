use crate::agent::{Agent, Message};
use crate::core::alarms::AlarmRegistry;
use crate::core::notifications::DesktopNotifier;
use crate::core::settings::FileSettingsStore;
use crate::core::watcher::SettingsWatcher;
use crate::daemon::dbus::{start_dbus_server, DbusRequest};
use crate::daemon::tray::{TrayEvent, TrayManager};
use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

pub async fn run() -> Result<()> {
    let store = Arc::new(FileSettingsStore::open_default()?);
    tracing::info!(path = ?store.path(), "Using settings file");

    let (alarms, mut fired_rx) = AlarmRegistry::new();
    let alarms = Arc::new(alarms);

    let (tray, mut tray_rx) = TrayManager::start().await?;
    let tray = Arc::new(tray);

    let agent = Arc::new(Agent::new(
        store.clone(),
        alarms,
        tray.clone(),
        Arc::new(DesktopNotifier),
    ));

    let (dbus_tx, mut dbus_rx) = mpsc::unbounded_channel::<DbusRequest>();
    let _dbus_connection = start_dbus_server(dbus_tx).await?;

    let (_settings_watcher, mut settings_rx) = SettingsWatcher::start(store.path())?;

    // Alarms live in this process, so every daemon start is a fresh install.
    spawn_event(&agent, |agent| async move { agent.on_installed().await });

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            Some(name) = fired_rx.recv() => {
                spawn_event(&agent, |agent| async move { agent.on_alarm(&name).await });
            }
            Some(request) = dbus_rx.recv() => {
                spawn_event(&agent, |agent| async move {
                    let reply = agent.handle_raw(&request.message).await;
                    if request.respond_to.send(reply).is_err() {
                        tracing::debug!("D-Bus caller went away before the reply");
                    }
                });
            }
            Some(()) = settings_rx.recv() => {
                spawn_event(&agent, |agent| async move {
                    let settings = agent.get_settings().await;
                    let message = Message::SettingsChanged {
                        watch_interval: settings.watch_interval,
                    };
                    agent.handle_message(message).await;
                });
            }
            Some(event) = tray_rx.recv() => {
                if event == TrayEvent::Quit {
                    tracing::info!("Quit requested");
                    break;
                }
                spawn_event(&agent, move |agent| handle_tray_event(agent, event));
            }
            _ = &mut shutdown => {
                tracing::info!("Interrupted, shutting down");
                break;
            }
            else => break,
        }
    }

    tray.shutdown().await;
    Ok(())
}

/// Runs one host event as its own task. Events are not serialized against each other.
fn spawn_event<F, Fut>(agent: &Arc<Agent>, f: F)
where
    F: FnOnce(Arc<Agent>) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(f(Arc::clone(agent)));
}

async fn handle_tray_event(agent: Arc<Agent>, event: TrayEvent) {
    match event {
        TrayEvent::OpenPanel => {
            let url = agent.get_settings().await.panel_url();
            tracing::info!(url = %url, "Opening panel");
            if let Err(e) = open::that(&url) {
                tracing::error!(error = %e, "Failed to open browser");
            }
        }
        TrayEvent::ScanNow => {
            tracing::info!("Manual scan requested from tray");
            match agent.handle_message(Message::ScanNow).await {
                Some(reply) if reply.ok => agent.update_badge().await,
                Some(reply) => {
                    tracing::warn!(error = ?reply.error, "Manual scan from tray failed");
                }
                None => {}
            }
        }
        TrayEvent::ClearBadge => {
            agent.handle_message(Message::ClearBadge).await;
        }
        TrayEvent::Quit => {}
    }
}
