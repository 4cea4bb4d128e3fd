//! Presentation-facing state: configuration and the selected history.

pub mod config;
pub mod history;

pub use config::HistoryConfig;
pub use history::{CommitHistory, HistoryEvent};
