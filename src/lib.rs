// Sales Dashboard - terminal client for a CSV sales-analytics server

pub mod client;
pub mod config;
pub mod dashboard;
pub mod intake;
pub mod mapping;
pub mod models;
pub mod report;
pub mod tui;       // Terminal User Interface
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use types::{AppError, AppResult};
