pub mod add;
pub mod badge;
pub mod client;
pub mod scan;
pub mod settings;
