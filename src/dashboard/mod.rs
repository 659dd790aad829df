//! Results Renderer
//!
//! Turns an [`AnalysisResult`] into metric cards and chart panels. Every
//! render starts by disposing the previous charts, so rendering twice leaves
//! only the second payload's charts live.

pub mod charts;
pub mod metrics;

pub use charts::{build_chart, report_for, ChartHandle, ChartKind, ChartRegistry, PanelId, ReportSpec, Series, REPORTS};
pub use metrics::{average_order_value, metric_cards, MetricCard};

use crate::models::AnalysisResult;
use tracing::info;

/// Informational message shown when nothing could be rendered
pub const NO_RESULTS_MESSAGE: &str =
    "No analysis results could be generated. Please check your data and column mappings.";

/// What the results area shows after a render
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub metrics: Option<Vec<MetricCard>>,
    /// Panels in display order, each registered in the chart registry
    pub panels: Vec<PanelId>,
}

impl ResultsView {
    /// Neither metrics nor panels were produced
    pub fn is_empty(&self) -> bool {
        self.metrics.is_none() && self.panels.is_empty()
    }

    /// Informational notice to show in place of an empty view
    pub fn notice(&self) -> Option<&'static str> {
        self.is_empty().then_some(NO_RESULTS_MESSAGE)
    }
}

/// Render `result` into `registry`, replacing whatever it held
pub fn render_results(result: &AnalysisResult, registry: &mut ChartRegistry) -> ResultsView {
    registry.dispose_all();

    let metrics = metric_cards(result);

    let mut panels = Vec::new();
    for spec in REPORTS.iter() {
        if let Some(rows) = result.rows(spec.key) {
            registry.insert(build_chart(spec, rows));
            panels.push(spec.panel);
        }
    }

    info!(
        "Rendered results: metrics={}, charts={}",
        metrics.is_some(),
        panels.len()
    );

    ResultsView { metrics, panels }
}
