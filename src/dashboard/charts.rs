//! Chart panels and their registry
//!
//! Each report maps to one fixed panel. A [`ChartHandle`] owns the prepared
//! series for its panel until it is disposed; the [`ChartRegistry`] keeps at
//! most one live handle per panel.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Stable identifier of a chart panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PanelId {
    TopCustomers,
    MonthlySales,
    TopProducts,
    SalesByCountry,
    SalesByDay,
    SalesByHour,
    AovByMonth,
    SalesAndAovByMonth,
}

impl PanelId {
    pub fn as_str(self) -> &'static str {
        match self {
            PanelId::TopCustomers => "topCustomersChart",
            PanelId::MonthlySales => "monthlySalesChart",
            PanelId::TopProducts => "topProductsChart",
            PanelId::SalesByCountry => "salesByCountryChart",
            PanelId::SalesByDay => "salesByDayChart",
            PanelId::SalesByHour => "salesByHourChart",
            PanelId::AovByMonth => "aovByMonthChart",
            PanelId::SalesAndAovByMonth => "salesAndAovByMonthChart",
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Vertical bars
    Bar,
    HorizontalBar,
    Line,
    /// Two line series, left axis for the first, right axis for the second
    DualAxisLine,
}

/// Static description of one report panel
#[derive(Debug, Clone, Copy)]
pub struct ReportSpec {
    /// Key in the analysis payload
    pub key: &'static str,
    pub panel: PanelId,
    pub title: &'static str,
    pub kind: ChartKind,
    pub label_field: &'static str,
    /// `(row field, series name)`, left axis first
    pub series: &'static [(&'static str, &'static str)],
}

pub static REPORTS: [ReportSpec; 8] = [
    ReportSpec {
        key: "Top Customers",
        panel: PanelId::TopCustomers,
        title: "Top 5 Customers by Revenue",
        kind: ChartKind::HorizontalBar,
        label_field: "customer_id",
        series: &[("total_revenue", "Total Revenue")],
    },
    ReportSpec {
        key: "Monthly Sales Trends",
        panel: PanelId::MonthlySales,
        title: "Monthly Sales Trends",
        kind: ChartKind::Line,
        label_field: "month",
        series: &[("sales", "Monthly Sales")],
    },
    ReportSpec {
        key: "Top Products",
        panel: PanelId::TopProducts,
        title: "Top 5 Products by Revenue",
        kind: ChartKind::HorizontalBar,
        label_field: "product",
        series: &[("total_sales", "Total Sales by Product")],
    },
    ReportSpec {
        key: "Sales by Country",
        panel: PanelId::SalesByCountry,
        title: "Sales by Country",
        kind: ChartKind::HorizontalBar,
        label_field: "country",
        series: &[("total_sales", "Sales by Country")],
    },
    ReportSpec {
        key: "Sales by Day",
        panel: PanelId::SalesByDay,
        title: "Sales by Day of the Week",
        kind: ChartKind::Bar,
        label_field: "day",
        series: &[("sales", "Sales by Day of the Week")],
    },
    ReportSpec {
        key: "Sales by Hour",
        panel: PanelId::SalesByHour,
        title: "Sales by Hour of the Day",
        kind: ChartKind::Bar,
        label_field: "hour",
        series: &[("sales", "Sales by Hour of the Day")],
    },
    ReportSpec {
        key: "AOV by Month",
        panel: PanelId::AovByMonth,
        title: "Average Order Value by Month",
        kind: ChartKind::Line,
        label_field: "month",
        series: &[("aov", "Average Order Value")],
    },
    ReportSpec {
        key: "Sales and AOV by Month",
        panel: PanelId::SalesAndAovByMonth,
        title: "Sales and AOV by Month",
        kind: ChartKind::DualAxisLine,
        label_field: "month",
        series: &[("monthly_sales", "Monthly Sales"), ("aov", "Average Order Value")],
    },
];

pub fn report_for(panel: PanelId) -> &'static ReportSpec {
    // REPORTS is ordered like PanelId
    &REPORTS[panel as usize]
}

/// One named series; `None` marks a row that lacked the field
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: &'static str,
    pub values: Vec<Option<f64>>,
}

impl Series {
    /// `(min, max)` over the present values
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.values.iter().flatten().fold(None, |acc, v| match acc {
            None => Some((*v, *v)),
            Some((lo, hi)) => Some((lo.min(*v), hi.max(*v))),
        })
    }

    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }
}

/// A live chart bound to a panel
#[derive(Debug, Clone, PartialEq)]
pub struct ChartHandle {
    pub panel: PanelId,
    pub kind: ChartKind,
    pub title: &'static str,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    live: bool,
}

impl ChartHandle {
    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Release the prepared data. Safe to call twice.
    pub fn dispose(&mut self) {
        if self.live {
            debug!("Disposing chart {}", self.panel);
            self.live = false;
            self.labels = Vec::new();
            self.series = Vec::new();
        }
    }
}

/// Text form of a label cell
fn label_of(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Numeric form of a data cell, accepting numeric strings
fn number_of(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Build the chart for `spec` from its report rows
pub fn build_chart(spec: &ReportSpec, rows: &[Value]) -> ChartHandle {
    let labels = rows.iter().map(|row| label_of(row.get(spec.label_field))).collect();
    let series = spec
        .series
        .iter()
        .map(|&(field, name)| Series {
            name,
            values: rows.iter().map(|row| number_of(row.get(field))).collect(),
        })
        .collect();

    ChartHandle {
        panel: spec.panel,
        kind: spec.kind,
        title: spec.title,
        labels,
        series,
        live: true,
    }
}

/// Live charts keyed by panel
#[derive(Debug, Default)]
pub struct ChartRegistry {
    charts: BTreeMap<PanelId, ChartHandle>,
    disposed: usize,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handle`, disposing whatever held its panel before
    pub fn insert(&mut self, handle: ChartHandle) {
        if let Some(mut previous) = self.charts.insert(handle.panel, handle) {
            previous.dispose();
            self.disposed += 1;
        }
    }

    pub fn get(&self, panel: PanelId) -> Option<&ChartHandle> {
        self.charts.get(&panel)
    }

    pub fn panels(&self) -> impl Iterator<Item = PanelId> + '_ {
        self.charts.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    /// Total handles disposed over the registry's lifetime
    pub fn disposed_count(&self) -> usize {
        self.disposed
    }

    /// Dispose every handle and empty the registry; returns how many were live
    pub fn dispose_all(&mut self) -> usize {
        let count = self.charts.len();
        for (_, mut handle) in std::mem::take(&mut self.charts) {
            handle.dispose();
        }
        self.disposed += count;
        if count > 0 {
            debug!("Disposed {} charts", count);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_table_matches_panel_order() {
        for (i, spec) in REPORTS.iter().enumerate() {
            assert_eq!(spec.panel as usize, i);
            assert_eq!(report_for(spec.panel).key, spec.key);
        }
    }

    #[test]
    fn test_build_chart_reads_named_fields() {
        let rows = vec![
            json!({"customer_id": 12346, "total_revenue": 77183.6}),
            json!({"customer_id": 12347, "total_revenue": "4310"}),
        ];
        let chart = build_chart(report_for(PanelId::TopCustomers), &rows);
        assert_eq!(chart.kind, ChartKind::HorizontalBar);
        assert_eq!(chart.labels, vec!["12346", "12347"]);
        assert_eq!(chart.series[0].values, vec![Some(77183.6), Some(4310.0)]);
    }

    #[test]
    fn test_non_finite_strings_are_missing_points() {
        let rows = vec![
            json!({"day": "Monday", "sales": "NaN"}),
            json!({"day": "Tuesday", "sales": "inf"}),
            json!({"day": "Wednesday", "sales": " 12.5 "}),
        ];
        let chart = build_chart(report_for(PanelId::SalesByDay), &rows);
        assert_eq!(chart.series[0].values, vec![None, None, Some(12.5)]);
    }

    #[test]
    fn test_missing_field_degrades_to_missing_point() {
        let rows = vec![json!({"month": "2011-01", "monthly_sales": 10.0}), json!({"aov": 2.0})];
        let chart = build_chart(report_for(PanelId::SalesAndAovByMonth), &rows);
        assert_eq!(chart.labels, vec!["2011-01", ""]);
        assert_eq!(chart.series[0].values, vec![Some(10.0), None]);
        assert_eq!(chart.series[1].values, vec![None, Some(2.0)]);
        assert_eq!(chart.series[1].bounds(), Some((2.0, 2.0)));
    }

    #[test]
    fn test_insert_disposes_previous_handle() {
        let rows = vec![json!({"day": "Monday", "sales": 1.0})];
        let mut registry = ChartRegistry::new();
        registry.insert(build_chart(report_for(PanelId::SalesByDay), &rows));
        registry.insert(build_chart(report_for(PanelId::SalesByDay), &rows));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.disposed_count(), 1);
    }

    #[test]
    fn test_dispose_all_is_idempotent() {
        let mut registry = ChartRegistry::new();
        assert_eq!(registry.dispose_all(), 0);
        registry.insert(build_chart(report_for(PanelId::SalesByHour), &[json!({"hour": 7, "sales": 3})]));
        assert_eq!(registry.dispose_all(), 1);
        assert_eq!(registry.dispose_all(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_dispose_releases_data() {
        let mut chart = build_chart(report_for(PanelId::AovByMonth), &[json!({"month": "m", "aov": 1})]);
        chart.dispose();
        assert!(!chart.is_live());
        assert!(chart.is_empty());
        chart.dispose();
    }
}
