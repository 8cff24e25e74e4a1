use crate::core::badge::{Badge, BADGE_COLOR};
use crate::icons::renderer::{parse_hex, rgba_to_argb, IconRenderer};
use anyhow::{Context, Result};
use async_trait::async_trait;
use ksni::menu::StandardItem;
use ksni::{Handle, MenuItem, TrayMethods};
use tokio::sync::mpsc;

const TRAY_ID: &str = "jobgo-bar";
const TRAY_TITLE: &str = "JobGo";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayEvent {
    OpenPanel,
    ScanNow,
    ClearBadge,
    Quit,
}

struct JobTray {
    badge_text: String,
    badge_color: (u8, u8, u8),
    renderer: IconRenderer,
    events: mpsc::UnboundedSender<TrayEvent>,
}

impl JobTray {
    fn emit(&self, event: TrayEvent) {
        if self.events.send(event).is_err() {
            tracing::warn!(?event, "Tray event dropped, daemon loop is gone");
        }
    }

    fn label(&self) -> String {
        if self.badge_text.is_empty() {
            TRAY_TITLE.to_string()
        } else {
            format!("{TRAY_TITLE} ({})", self.badge_text)
        }
    }
}

impl ksni::Tray for JobTray {
    fn id(&self) -> String {
        TRAY_ID.to_string()
    }

    fn category(&self) -> ksni::Category {
        ksni::Category::ApplicationStatus
    }

    fn title(&self) -> String {
        self.label()
    }

    fn status(&self) -> ksni::Status {
        if self.badge_text.is_empty() {
            ksni::Status::Active
        } else {
            ksni::Status::NeedsAttention
        }
    }

    fn icon_pixmap(&self) -> Vec<ksni::Icon> {
        let size = self.renderer.size() as i32;
        let pixels = self
            .renderer
            .render(!self.badge_text.is_empty(), self.badge_color);
        vec![ksni::Icon {
            width: size,
            height: size,
            data: rgba_to_argb(&pixels),
        }]
    }

    fn attention_icon_pixmap(&self) -> Vec<ksni::Icon> {
        self.icon_pixmap()
    }

    fn tool_tip(&self) -> ksni::ToolTip {
        let description = if self.badge_text.is_empty() {
            "No new jobs".to_string()
        } else {
            format!("{} new job(s)", self.badge_text)
        };
        ksni::ToolTip {
            title: self.label(),
            description,
            icon_name: String::new(),
            icon_pixmap: Vec::new(),
        }
    }

    fn activate(&mut self, _x: i32, _y: i32) {
        self.emit(TrayEvent::OpenPanel);
    }

    fn menu(&self) -> Vec<MenuItem<Self>> {
        vec![
            StandardItem {
                label: "Open panel".to_string(),
                activate: Box::new(|tray: &mut Self| tray.emit(TrayEvent::OpenPanel)),
                ..Default::default()
            }
            .into(),
            StandardItem {
                label: "Scan now".to_string(),
                activate: Box::new(|tray: &mut Self| tray.emit(TrayEvent::ScanNow)),
                ..Default::default()
            }
            .into(),
            StandardItem {
                label: "Clear badge".to_string(),
                enabled: !self.badge_text.is_empty(),
                activate: Box::new(|tray: &mut Self| tray.emit(TrayEvent::ClearBadge)),
                ..Default::default()
            }
            .into(),
            MenuItem::Separator,
            StandardItem {
                label: "Quit".to_string(),
                icon_name: "application-exit".to_string(),
                activate: Box::new(|tray: &mut Self| tray.emit(TrayEvent::Quit)),
                ..Default::default()
            }
            .into(),
        ]
    }
}

/// The StatusNotifierItem carrying the badge.
pub struct TrayManager {
    handle: Handle<JobTray>,
}

impl TrayManager {
    pub async fn start() -> Result<(Self, mpsc::UnboundedReceiver<TrayEvent>)> {
        let (events, event_rx) = mpsc::unbounded_channel();
        let tray = JobTray {
            badge_text: String::new(),
            badge_color: parse_hex(BADGE_COLOR).unwrap_or((37, 99, 235)),
            renderer: IconRenderer::new(),
            events,
        };

        let handle = tray
            .spawn()
            .await
            .context("Failed to register tray icon - is a StatusNotifier host running?")?;
        tracing::info!(id = TRAY_ID, "Tray icon registered");

        Ok((Self { handle }, event_rx))
    }

    pub async fn shutdown(&self) {
        self.handle.shutdown().await;
    }
}

#[async_trait]
impl Badge for TrayManager {
    async fn set_text(&self, text: &str) {
        let text = text.to_string();
        if self
            .handle
            .update(move |tray: &mut JobTray| tray.badge_text = text)
            .await
            .is_none()
        {
            tracing::warn!("Tray is gone, badge text not updated");
        }
    }

    async fn set_background_color(&self, color: &str) {
        let Some(rgb) = parse_hex(color) else {
            tracing::warn!(color, "Ignoring unparsable badge colour");
            return;
        };
        if self
            .handle
            .update(move |tray: &mut JobTray| tray.badge_color = rgb)
            .await
            .is_none()
        {
            tracing::warn!("Tray is gone, badge colour not updated");
        }
    }
}
