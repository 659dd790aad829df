//! TUI Widgets
//!
//! Custom widgets for the sales dashboard.

mod charts;
mod intake;
mod mapping;
mod metrics;
mod progress;

pub use charts::render_chart;
pub use intake::{render_intake, INTAKE_HEIGHT};
pub use mapping::{render_mapping, MAPPING_HEIGHT};
pub use metrics::{render_metrics, METRICS_HEIGHT};
pub use progress::render_progress;
