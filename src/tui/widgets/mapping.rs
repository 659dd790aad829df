//! Column Mapping Widget
//!
//! One row per semantic field with its selected column. The focused row
//! carries the selection marker and can be cycled with ←/→.

use crate::mapping::ColumnMapper;
use crate::models::SemanticField;
use crate::tui::theme::{Icons, Theme};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Rows needed by the mapping panel, borders included
pub const MAPPING_HEIGHT: u16 = SemanticField::ALL.len() as u16 + 3;

const UNSET: &str = "(not mapped)";

/// Render the mapping panel
pub fn render_mapping(frame: &mut Frame, area: Rect, mapper: &ColumnMapper, focused: bool) {
    let block = Block::default()
        .title(" Map Columns ")
        .borders(Borders::ALL)
        .border_style(Theme::panel_border(focused));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    render_field_list(frame, chunks[0], mapper, focused);
    render_footer(frame, chunks[1], mapper);
}

fn render_field_list(frame: &mut Frame, area: Rect, mapper: &ColumnMapper, focused: bool) {
    let mut lines = Vec::new();

    for field in SemanticField::ALL {
        let is_selected = focused && field == mapper.focused_field();
        let column = mapper.selection(field);

        let prefix = if is_selected { Icons::SELECTED } else { " " };
        let name_style = if is_selected {
            Theme::selected()
        } else {
            Theme::text()
        };

        let value = if column.is_empty() {
            Span::styled(UNSET, Theme::text_dim())
        } else {
            Span::styled(column.to_string(), Theme::success())
        };

        let mut spans = vec![
            Span::styled(format!("{} ", prefix), name_style),
            Span::styled(format!("{:<22}", field.label()), name_style),
        ];
        if is_selected {
            spans.push(Span::styled("◀ ", Theme::shortcut_key()));
            spans.push(value);
            spans.push(Span::styled(" ▶", Theme::shortcut_key()));
        } else {
            spans.push(Span::raw("  "));
            spans.push(value);
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_footer(frame: &mut Frame, area: Rect, mapper: &ColumnMapper) {
    let line = Line::from(vec![
        Span::styled(format!("{} columns ", mapper.columns().len()), Theme::text_dim()),
        Span::styled("[↑/↓]", Theme::shortcut_key()),
        Span::styled(" Field ", Theme::shortcut_desc()),
        Span::styled("[←/→]", Theme::shortcut_key()),
        Span::styled(" Column ", Theme::shortcut_desc()),
        Span::styled("[Enter]", Theme::shortcut_key()),
        Span::styled(" Analyze", Theme::shortcut_desc()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
