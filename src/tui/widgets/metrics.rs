//! Metric cards

use crate::dashboard::MetricCard;
use crate::tui::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Rows needed by the card strip
pub const METRICS_HEIGHT: u16 = 3;

/// Render the cards side by side
pub fn render_metrics(frame: &mut Frame, area: Rect, cards: &[MetricCard]) {
    if cards.is_empty() {
        return;
    }

    let count = cards.len() as u32;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(cards.iter().map(|_| Constraint::Ratio(1, count)))
        .split(area);

    for (card, chunk) in cards.iter().zip(chunks.iter()) {
        let block = Block::default()
            .title(Line::styled(format!(" {} ", card.title), Theme::text_secondary()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let value = Paragraph::new(Line::styled(card.value.clone(), Theme::metric_value()))
            .alignment(Alignment::Center)
            .block(block);

        frame.render_widget(value, *chunk);
    }
}
