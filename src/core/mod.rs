pub mod alarms;
pub mod badge;
pub mod models;
pub mod notifications;
pub mod settings;
pub mod watcher;
