//! Intake Widget
//!
//! The drop zone: shows the selected file, or how to provide one, above the
//! path input.

use crate::tui::app::App;
use crate::tui::theme::{Icons, Theme};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Rows needed by the intake panel, borders included
pub const INTAKE_HEIGHT: u16 = 4;

/// Render the intake panel
pub fn render_intake(frame: &mut Frame, area: Rect, app: &App, focused: bool) {
    let block = Block::default()
        .title(" Upload CSV ")
        .borders(Borders::ALL)
        .border_style(Theme::panel_border(focused));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let status = match &app.current_file {
        Some(file) => Line::from(vec![
            Span::raw(format!("{} ", Icons::FILE)),
            Span::styled(format!(" {} ", file.name), Theme::badge_success()),
            Span::styled(format!(" {} bytes  ", file.len()), Theme::text_secondary()),
            Span::styled("[Ctrl+U]", Theme::shortcut_key()),
            Span::styled(" Re-upload ", Theme::shortcut_desc()),
            Span::styled("[Ctrl+D]", Theme::shortcut_key()),
            Span::styled(" Clear", Theme::shortcut_desc()),
        ]),
        None => Line::from(vec![
            Span::styled("Drop a CSV file onto the terminal, type its path, or press ", Theme::text_secondary()),
            Span::styled("[Ctrl+L]", Theme::shortcut_key()),
            Span::styled(" for sample data", Theme::text_secondary()),
        ]),
    };
    frame.render_widget(Paragraph::new(status), chunks[0]);

    frame.render_widget(&app.path_input, chunks[1]);
}
