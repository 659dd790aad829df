//! UI Rendering
//!
//! Main UI layout and rendering logic for the TUI.

use crate::tui::app::{AlertKind, App, Focus, PipelineStage, ResultsArea, View};
use crate::tui::theme::{Icons, Theme};
use crate::tui::widgets;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the main UI
pub fn render(frame: &mut Frame, app: &App) {
    let mapping_height = if app.mapping_visible && app.mapper.is_some() {
        widgets::MAPPING_HEIGHT
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                     // Header
            Constraint::Length(3),                     // Progress
            Constraint::Length(widgets::INTAKE_HEIGHT), // Drop zone
            Constraint::Length(mapping_height),        // Column mapping
            Constraint::Min(8),                        // Results
            Constraint::Length(1),                     // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    widgets::render_progress(frame, chunks[1], &app.pipeline_stage, app.mapping_visible);
    widgets::render_intake(frame, chunks[2], app, app.focus == Focus::Intake);
    if let (true, Some(mapper)) = (mapping_height > 0, app.mapper.as_ref()) {
        widgets::render_mapping(frame, chunks[3], mapper, app.focus == Focus::Mapping);
    }
    render_results(frame, chunks[4], app);
    render_status_bar(frame, chunks[5], app);

    if app.view == View::Help {
        render_help(frame);
    }
}

/// Render the header with the server address
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let title_text = vec![Line::from(vec![
        Span::raw("📊 "),
        Span::styled("Sales", Theme::title()),
        Span::styled(" Dashboard", Theme::text_secondary()),
        Span::raw("  "),
        Span::styled(app.config.server.base_url.clone(), Theme::text_dim()),
    ])];

    let title = Paragraph::new(title_text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );

    frame.render_widget(title, area);
}

fn spinner(app: &App) -> &'static str {
    Icons::SPINNER[app.spinner_frame % Icons::SPINNER.len()]
}

/// Render the results area
fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let title = match &app.results {
        ResultsArea::Rendered(_) if app.page_count() > 1 => format!(
            " Results (page {}/{}) [PgUp/PgDn] ",
            app.results_page + 1,
            app.page_count()
        ),
        _ => " Results ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Theme::panel_border(app.focus == Focus::Results));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &app.results {
        ResultsArea::Empty => {
            let line = if app.loading {
                Line::from(vec![
                    Span::styled(format!("{} ", spinner(app)), Theme::active()),
                    Span::styled("Working...", Theme::text_secondary()),
                ])
            } else {
                Line::from(Span::styled(
                    "Upload a file and map its columns to see results here.",
                    Theme::text_dim(),
                ))
            };
            frame.render_widget(Paragraph::new(line), inner);
        }
        ResultsArea::Alert(alert) => {
            let (icon, style) = match alert.kind {
                AlertKind::Error => (Icons::ERROR, Theme::error()),
                AlertKind::Info => (Icons::DOT, Theme::info()),
            };
            let lines = vec![
                Line::from(vec![
                    Span::styled(format!("{} ", icon), style),
                    Span::styled(alert.message.clone(), style),
                ]),
                Line::from(vec![
                    Span::styled(alert.raised_at.format("%H:%M:%S ").to_string(), Theme::text_dim()),
                    Span::styled("[Esc]", Theme::shortcut_key()),
                    Span::styled(" Dismiss", Theme::shortcut_desc()),
                ]),
            ];
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
        }
        ResultsArea::Rendered(view) => {
            let metrics_height = if view.metrics.is_some() {
                widgets::METRICS_HEIGHT
            } else {
                0
            };
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(metrics_height), Constraint::Min(0)])
                .split(inner);

            if let Some(cards) = &view.metrics {
                widgets::render_metrics(frame, chunks[0], cards);
            }
            render_chart_grid(frame, chunks[1], app);
        }
    }
}

/// Lay the current page of charts out two per row
fn render_chart_grid(frame: &mut Frame, area: Rect, app: &App) {
    let panels = app.visible_panels();
    if panels.is_empty() {
        return;
    }

    let row_count = panels.len().div_ceil(2) as u32;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints((0..row_count).map(|_| Constraint::Ratio(1, row_count)))
        .split(area);

    let focused = app.focus == Focus::Results;
    for (row_panels, row_area) in panels.chunks(2).zip(rows.iter()) {
        let cols = row_panels.len() as u32;
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints((0..cols).map(|_| Constraint::Ratio(1, cols)))
            .split(*row_area);

        for (panel, cell) in row_panels.iter().zip(cells.iter()) {
            if let Some(chart) = app.charts.get(*panel) {
                widgets::render_chart(frame, *cell, chart, app.chart_cursor, focused);
            }
        }
    }
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let status = match &app.pipeline_stage {
        PipelineStage::Idle => Span::styled("Ready", Theme::text_secondary()),
        PipelineStage::Uploading => {
            Span::styled(format!("{} Uploading...", spinner(app)), Theme::active())
        }
        PipelineStage::Mapping => Span::styled("Map columns, then Enter", Theme::text_secondary()),
        PipelineStage::Analyzing => {
            Span::styled(format!("{} Analyzing...", spinner(app)), Theme::active())
        }
        PipelineStage::Complete => Span::styled("Complete", Theme::complete()),
        PipelineStage::Error(_) => Span::styled("Failed", Theme::error()),
    };

    let shortcuts = vec![
        Span::styled(" [Enter]", Theme::shortcut_key()),
        Span::styled(" Upload/Analyze ", Theme::shortcut_desc()),
        Span::styled("[Tab]", Theme::shortcut_key()),
        Span::styled(" Focus ", Theme::shortcut_desc()),
        Span::styled("[Ctrl+L]", Theme::shortcut_key()),
        Span::styled(" Sample ", Theme::shortcut_desc()),
        Span::styled("[Ctrl+Q]", Theme::shortcut_key()),
        Span::styled(" Quit ", Theme::shortcut_desc()),
        Span::styled("[F1]", Theme::shortcut_key()),
        Span::styled(" Help", Theme::shortcut_desc()),
    ];

    let line = Line::from(
        std::iter::once(status)
            .chain(std::iter::once(Span::raw(" │ ")))
            .chain(shortcuts)
            .collect::<Vec<_>>(),
    );

    frame.render_widget(Paragraph::new(line), area);
}

fn help_line(keys: &'static str, description: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<14}", keys), Theme::shortcut_key()),
        Span::styled(description, Theme::text()),
    ])
}

/// Render the help modal
fn render_help(frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let help_lines = vec![
        Line::from(Span::styled("Keyboard Shortcuts", Theme::heading())),
        Line::from(""),
        help_line("Enter", "Upload typed path / Analyze"),
        help_line("Drop / Paste", "Upload the dropped file"),
        help_line("Ctrl+L", "Load sample data"),
        help_line("Ctrl+U", "Upload the current file again"),
        help_line("Ctrl+D", "Clear file and results"),
        help_line("Tab/Shift+Tab", "Move focus between panels"),
        help_line("↑/↓", "Choose field (mapping)"),
        help_line("←/→", "Choose column / move chart cursor"),
        help_line("PageUp/Down", "Previous / next page of charts"),
        help_line("Esc", "Close help / dismiss message"),
        help_line("Ctrl+Q", "Quit application"),
        help_line("Ctrl+C", "Force quit"),
        help_line("F1", "Toggle this help"),
    ];

    let paragraph = Paragraph::new(help_lines).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Theme::border_focused()),
    );

    frame.render_widget(paragraph, area);
}

/// Helper to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeBackend;
    use crate::config::Config;
    use crate::dashboard::render_results as render_payload;
    use crate::mapping::ColumnMapper;
    use crate::models::AnalysisResult;
    use crate::tui::app::Alert;
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;
    use std::sync::Arc;

    fn app() -> App {
        App::new(Config::default(), Arc::new(FakeBackend::default()))
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 48)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_initial_screen() {
        let text = screen(&app());
        assert!(text.contains("Upload CSV"));
        assert!(text.contains("for sample data"));
        assert!(!text.contains("[↑/↓]"));
    }

    #[test]
    fn test_mapping_panel_shows_preselection() {
        let mut app = app();
        app.mapper = Some(ColumnMapper::new(vec!["CustomerID".into(), "Country".into()]));
        app.mapping_visible = true;
        app.focus = Focus::Mapping;

        let text = screen(&app);
        assert!(text.contains("[↑/↓]"));
        assert!(text.contains("◀ CustomerID ▶"));
        assert!(text.contains("(not mapped)"));
    }

    #[test]
    fn test_alert_is_shown() {
        let mut app = app();
        app.results = ResultsArea::Alert(Alert::error("Error: Invalid file type."));
        let text = screen(&app);
        assert!(text.contains("Error: Invalid file type."));
        assert!(text.contains("Dismiss"));
    }

    #[test]
    fn test_results_with_metrics_and_charts() {
        let mut app = app();
        let result: AnalysisResult = serde_json::from_value(json!({
            "Total Revenue": "$1,000.00",
            "Total Transactions": 4,
            "Unique Customers": 2,
            "Sales by Day": [{"day": "Monday", "sales": 5.0}],
            "Sales by Hour": [{"hour": 9, "sales": 5.0}]
        }))
        .unwrap();
        let view = render_payload(&result, &mut app.charts);
        app.results = ResultsArea::Rendered(view);

        let text = screen(&app);
        assert!(text.contains("Average Order Value"));
        assert!(text.contains("$250.00"));
        assert!(text.contains("Sales by Day of the Week"));
        assert!(text.contains("Sales by Hour of the Day"));
        assert!(!text.contains("page 1/"));
    }

    #[test]
    fn test_help_overlay() {
        let mut app = app();
        app.view = View::Help;
        assert!(screen(&app).contains("Keyboard Shortcuts"));
    }
}
