use async_trait::async_trait;

pub const BADGE_COLOR: &str = "#2563eb";

/// Text overlay on the tray icon.
#[async_trait]
pub trait Badge: Send + Sync {
    async fn set_text(&self, text: &str);
    async fn set_background_color(&self, color: &str);
}
