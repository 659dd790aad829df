//! Chart Widgets
//!
//! Draws a [`ChartHandle`] as a bar chart, a line chart, or a line chart
//! with a second value axis on the right. The results cursor is the shared
//! hover index: its label and every series value at that index appear in
//! the panel's bottom border.

use crate::dashboard::{ChartHandle, ChartKind, Series};
use crate::tui::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

const MAX_LABEL_WIDTH: usize = 14;

/// Render one chart panel
pub fn render_chart(frame: &mut Frame, area: Rect, chart: &ChartHandle, cursor: usize, focused: bool) {
    let index = cursor.min(chart.len().saturating_sub(1));

    let block = Block::default()
        .title(Span::styled(format!(" {} ", chart.title), Theme::heading()))
        .title_bottom(Line::from(Span::styled(readout(chart, index), Theme::text_secondary())))
        .borders(Borders::ALL)
        .border_style(Theme::panel_border(focused));

    if chart.is_empty() || chart.series.is_empty() {
        frame.render_widget(block, area);
        return;
    }

    match chart.kind {
        ChartKind::Bar => render_bars(frame, area, block, chart, index, Direction::Vertical),
        ChartKind::HorizontalBar => render_bars(frame, area, block, chart, index, Direction::Horizontal),
        ChartKind::Line => render_line(frame, area, block, chart, index),
        ChartKind::DualAxisLine => render_dual_axis(frame, area, block, chart, index),
    }
}

/// Short human form of a chart value
pub fn format_value(v: f64) -> String {
    let magnitude = v.abs();
    if magnitude >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if magnitude >= 10_000.0 {
        format!("{:.1}k", v / 1_000.0)
    } else if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}

fn truncate_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_WIDTH {
        label.to_string()
    } else {
        let head: String = label.chars().take(MAX_LABEL_WIDTH - 1).collect();
        format!("{}…", head)
    }
}

/// Bottom-border text for the hovered index
fn readout(chart: &ChartHandle, index: usize) -> String {
    let Some(label) = chart.labels.get(index) else {
        return String::new();
    };

    let values: Vec<String> = chart
        .series
        .iter()
        .map(|s| {
            let value = s.value_at(index).map(format_value).unwrap_or_else(|| "-".to_string());
            format!("{}: {}", s.name, value)
        })
        .collect();

    format!(" {} │ {} ", label, values.join(" │ "))
}

fn bar_value(value: Option<f64>) -> u64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.round() as u64,
        _ => 0,
    }
}

fn render_bars(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    chart: &ChartHandle,
    index: usize,
    direction: Direction,
) {
    let series = &chart.series[0];
    let color = Theme::series(chart.panel, 0);

    let bars: Vec<Bar> = chart
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let value = series.value_at(i);
            let style = if i == index {
                Style::default().fg(color).add_modifier(Modifier::REVERSED)
            } else {
                Style::default().fg(color)
            };
            Bar::default()
                .label(Line::from(truncate_label(label)))
                .value(bar_value(value))
                .text_value(value.map(format_value).unwrap_or_default())
                .style(style)
        })
        .collect();

    let (bar_width, bar_gap) = match direction {
        Direction::Vertical => {
            let slots = bars.len().max(1) as u16;
            let width = (area.width.saturating_sub(2) / slots).saturating_sub(1).clamp(1, 9);
            (width, 1)
        }
        Direction::Horizontal => (1, 0),
    };

    let widget = BarChart::default()
        .block(block)
        .direction(direction)
        .bar_width(bar_width)
        .bar_gap(bar_gap)
        .value_style(Theme::text())
        .label_style(Theme::text_secondary())
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(widget, area);
}

/// Axis range with a little headroom; flat or empty series still get a span
fn padded_bounds(bounds: Option<(f64, f64)>) -> (f64, f64) {
    let Some((lo, hi)) = bounds else {
        return (0.0, 1.0);
    };
    let span = if hi > lo { hi - lo } else { hi.abs().max(1.0) };
    (lo - span * 0.05, hi + span * 0.05)
}

fn points(series: &Series) -> Vec<(f64, f64)> {
    series
        .values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
        .collect()
}

fn value_labels(lo: f64, hi: f64) -> Vec<Span<'static>> {
    vec![
        Span::styled(format_value(lo), Theme::text_dim()),
        Span::styled(format_value((lo + hi) / 2.0), Theme::text_dim()),
        Span::styled(format_value(hi), Theme::text_dim()),
    ]
}

fn x_axis(chart: &ChartHandle) -> Axis<'static> {
    let last = chart.len().saturating_sub(1);
    let mut labels = vec![Span::styled(truncate_label(&chart.labels[0]), Theme::text_dim())];
    if last >= 2 {
        labels.push(Span::styled(truncate_label(&chart.labels[last / 2]), Theme::text_dim()));
    }
    if last >= 1 {
        labels.push(Span::styled(truncate_label(&chart.labels[last]), Theme::text_dim()));
    }

    Axis::default()
        .style(Theme::text_dim())
        .bounds([0.0, last.max(1) as f64])
        .labels(labels)
}

fn cursor_point(series: &Series, index: usize) -> Vec<(f64, f64)> {
    series.value_at(index).map(|v| vec![(index as f64, v)]).unwrap_or_default()
}

fn render_line(frame: &mut Frame, area: Rect, block: Block, chart: &ChartHandle, index: usize) {
    let series = &chart.series[0];
    let data = points(series);
    let hover = cursor_point(series, index);
    let (lo, hi) = padded_bounds(series.bounds());

    let datasets = vec![
        Dataset::default()
            .name(series.name)
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Theme::series(chart.panel, 0)))
            .data(&data),
        Dataset::default()
            .marker(Marker::Block)
            .graph_type(GraphType::Scatter)
            .style(Theme::selected())
            .data(&hover),
    ];

    let widget = Chart::new(datasets)
        .block(block)
        .x_axis(x_axis(chart))
        .y_axis(
            Axis::default()
                .style(Theme::text_dim())
                .bounds([lo, hi])
                .labels(value_labels(lo, hi)),
        );

    frame.render_widget(widget, area);
}

/// Map `v` from the `from` range onto the `to` range
fn rescale(v: f64, from: (f64, f64), to: (f64, f64)) -> f64 {
    to.0 + (v - from.0) / (from.1 - from.0) * (to.1 - to.0)
}

/// Right-axis labels aligned with the chart's top, middle and bottom rows
fn right_axis_lines(height: u16, lo: f64, hi: f64, style: Style) -> Vec<Line<'static>> {
    // The bottom two rows hold the x axis line and its labels
    let plot_rows = height.saturating_sub(2) as usize;
    if plot_rows == 0 {
        return Vec::new();
    }
    let bottom = plot_rows - 1;
    let middle = bottom / 2;

    (0..plot_rows)
        .map(|row| {
            let text = if row == 0 {
                format_value(hi)
            } else if row == bottom {
                format_value(lo)
            } else if row == middle {
                format_value((lo + hi) / 2.0)
            } else {
                String::new()
            };
            Line::from(Span::styled(text, style))
        })
        .collect()
}

fn render_dual_axis(frame: &mut Frame, area: Rect, block: Block, chart: &ChartHandle, index: usize) {
    let left = &chart.series[0];
    let Some(right) = chart.series.get(1) else {
        render_line(frame, area, block, chart, index);
        return;
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let left_range = padded_bounds(left.bounds());
    let right_range = padded_bounds(right.bounds());
    let right_style = Style::default().fg(Theme::series(chart.panel, 1));

    let label_width = [right_range.0, right_range.1, (right_range.0 + right_range.1) / 2.0]
        .iter()
        .map(|v| format_value(*v).len() as u16)
        .max()
        .unwrap_or(0)
        + 1;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(label_width)])
        .split(inner);

    let left_points = points(left);
    let right_points: Vec<(f64, f64)> = points(right)
        .into_iter()
        .map(|(x, y)| (x, rescale(y, right_range, left_range)))
        .collect();
    let hover: Vec<(f64, f64)> = cursor_point(left, index)
        .into_iter()
        .chain(
            cursor_point(right, index)
                .into_iter()
                .map(|(x, y)| (x, rescale(y, right_range, left_range))),
        )
        .collect();

    let datasets = vec![
        Dataset::default()
            .name(left.name)
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Theme::series(chart.panel, 0)))
            .data(&left_points),
        Dataset::default()
            .name(format!("{} (right)", right.name))
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(right_style)
            .data(&right_points),
        Dataset::default()
            .marker(Marker::Block)
            .graph_type(GraphType::Scatter)
            .style(Theme::selected())
            .data(&hover),
    ];

    let widget = Chart::new(datasets).x_axis(x_axis(chart)).y_axis(
        Axis::default()
            .style(Theme::text_dim())
            .bounds([left_range.0, left_range.1])
            .labels(value_labels(left_range.0, left_range.1)),
    );
    frame.render_widget(widget, chunks[0]);

    let labels = Paragraph::new(right_axis_lines(chunks[1].height, right_range.0, right_range.1, right_style))
        .alignment(Alignment::Right);
    frame.render_widget(labels, chunks[1]);
}
