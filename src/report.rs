//! Headless report
//!
//! Runs the whole flow without a terminal UI: intake, upload, pre-selected
//! mapping with optional overrides, analysis, render. The rendered registry
//! is then printed as plain text.

use crate::client::AnalyticsBackend;
use crate::dashboard::{render_results, ChartHandle, ChartKind, ChartRegistry, ResultsView};
use crate::intake;
use crate::mapping::ColumnMapper;
use crate::models::{FieldMapping, SemanticField};
use crate::types::AppResult;
use std::fmt::Write;
use std::path::PathBuf;
use tracing::{info, warn};

/// Where the report's CSV comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ReportSource {
    File(PathBuf),
    Sample,
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub source: ReportSource,
    /// Explicit `field → column` choices applied after pre-selection
    pub overrides: Vec<(SemanticField, String)>,
}

/// Parse a `--map field=column` argument. The field is a mapping key
/// (`country_col`) or its short form (`country`).
pub fn parse_override(arg: &str) -> Result<(SemanticField, String), String> {
    let (field, column) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=COLUMN, got '{}'", arg))?;
    let field = SemanticField::from_key(field.trim())
        .ok_or_else(|| format!("unknown field '{}'", field.trim()))?;
    Ok((field, column.trim().to_string()))
}

/// Outcome of a headless run
#[derive(Debug)]
pub struct Report {
    pub filename: String,
    pub mapping: FieldMapping,
    pub view: ResultsView,
    pub charts: ChartRegistry,
}

/// Drive upload → map → analyze → render against `backend`
pub async fn run_report(backend: &dyn AnalyticsBackend, options: &ReportOptions) -> AppResult<Report> {
    let file = match &options.source {
        ReportSource::File(path) => intake::read_local_file(path).await?,
        ReportSource::Sample => backend.fetch_sample().await?,
    };

    let upload = backend.upload(&file).await?;
    info!("Uploaded {} as {}", file.name, upload.filename);

    let mut mapper = ColumnMapper::new(upload.columns);
    let mut mapping = mapper.field_mapping();
    for (field, column) in &options.overrides {
        if !mapper.select(*field, Some(column.as_str())) {
            warn!("Column '{}' for {} is not in the uploaded file", column, field);
        }
        mapping.set(*field, column.as_str());
    }

    let result = backend.analyze(Some(&upload.filename), &mapping).await?;

    let mut charts = ChartRegistry::new();
    let view = render_results(&result, &mut charts);

    Ok(Report {
        filename: upload.filename,
        mapping,
        view,
        charts,
    })
}

fn kind_name(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::Bar => "bar",
        ChartKind::HorizontalBar => "horizontal bar",
        ChartKind::Line => "line",
        ChartKind::DualAxisLine => "dual-axis line",
    }
}

fn write_chart(out: &mut String, chart: &ChartHandle) {
    let _ = writeln!(out, "[{}] {} ({})", chart.panel, chart.title, kind_name(chart.kind));
    for (i, label) in chart.labels.iter().enumerate() {
        let values: Vec<String> = chart
            .series
            .iter()
            .map(|s| match s.value_at(i) {
                Some(v) => format!("{}={:.2}", s.name, v),
                None => format!("{}=-", s.name),
            })
            .collect();
        let _ = writeln!(out, "  {:<20} {}", label, values.join("  "));
    }
}

impl Report {
    /// Plain-text rendering for stdout
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "File: {}", self.filename);
        let _ = writeln!(out, "Mapping:");
        for field in SemanticField::ALL {
            let column = self.mapping.get(field);
            let _ = writeln!(
                out,
                "  {:<20} {}",
                field.label(),
                if column.is_empty() { "-" } else { column }
            );
        }

        if let Some(notice) = self.view.notice() {
            let _ = writeln!(out, "\n{}", notice);
            return out;
        }

        if let Some(cards) = &self.view.metrics {
            let _ = writeln!(out, "\nMetrics:");
            for card in cards {
                let _ = writeln!(out, "  {:<20} {}", card.title, card.value);
            }
        }

        for panel in &self.view.panels {
            if let Some(chart) = self.charts.get(*panel) {
                out.push('\n');
                write_chart(&mut out, chart);
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeBackend;
    use crate::dashboard::NO_RESULTS_MESSAGE;
    use crate::models::{AnalysisResult, UploadResponse};
    use crate::types::AppError;
    use serde_json::json;
    use tempfile::TempDir;

    fn upload_ok() -> AppResult<UploadResponse> {
        Ok(UploadResponse {
            columns: vec!["CustomerID".into(), "Nation".into()],
            filename: "orders.csv".into(),
        })
    }

    fn analysis(value: serde_json::Value) -> AppResult<AnalysisResult> {
        Ok(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override("country_col=Nation"),
            Ok((SemanticField::Country, "Nation".to_string()))
        );
        assert_eq!(
            parse_override("country = Nation"),
            Ok((SemanticField::Country, "Nation".to_string()))
        );
        assert!(parse_override("country").is_err());
        assert!(parse_override("colour=Red").is_err());
    }

    #[tokio::test]
    async fn test_report_from_sample_with_override() {
        let backend = FakeBackend::default()
            .with_sample(Ok(intake::sample_file(&b"CustomerID,Nation\n1,UK\n"[..])))
            .with_upload(upload_ok())
            .with_analysis(analysis(json!({
                "Total Revenue": "$1,000.00",
                "Total Transactions": 4,
                "Unique Customers": 1,
                "Sales by Country": [{"country": "UK", "total_sales": 1000.0}]
            })));
        let options = ReportOptions {
            source: ReportSource::Sample,
            overrides: vec![(SemanticField::Country, "Nation".into())],
        };

        let report = run_report(&backend, &options).await.unwrap();
        assert_eq!(report.mapping.customer_id_col, "CustomerID");
        assert_eq!(report.mapping.country_col, "Nation");
        assert_eq!(report.charts.len(), 1);

        let text = report.render_text();
        assert!(text.contains("Average Order Value  $250.00"));
        assert!(text.contains("[salesByCountryChart] Sales by Country (horizontal bar)"));
        assert!(text.contains("UK"));
        assert!(text.contains("Sales by Country=1000.00"));
    }

    #[tokio::test]
    async fn test_report_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("orders.csv");
        std::fs::write(&path, "CustomerID\n1\n").unwrap();

        let backend = FakeBackend::default()
            .with_upload(upload_ok())
            .with_analysis(analysis(json!({"Top Customers": []})));
        let options = ReportOptions {
            source: ReportSource::File(path),
            overrides: Vec::new(),
        };

        let report = run_report(&backend, &options).await.unwrap();
        assert!(report.render_text().contains(NO_RESULTS_MESSAGE));
        assert_eq!(backend.upload_count(), 1);
    }

    #[tokio::test]
    async fn test_report_stops_on_upload_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("orders.txt");
        std::fs::write(&path, "x").unwrap();

        let backend = FakeBackend::default()
            .with_upload(Err(AppError::Server("Invalid file type. Please upload a CSV file.".into())));
        let options = ReportOptions {
            source: ReportSource::File(path),
            overrides: Vec::new(),
        };

        let err = run_report(&backend, &options).await.unwrap_err();
        assert_eq!(err.to_string(), "Error: Invalid file type. Please upload a CSV file.");
        assert_eq!(backend.analysis_count(), 0);
    }
}
