//! Progress Widget
//!
//! Displays where the upload → analyze flow stands.

use crate::tui::app::PipelineStage;
use crate::tui::theme::{Icons, Theme};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the progress indicator
pub fn render_progress(frame: &mut Frame, area: Rect, stage: &PipelineStage, mapping_visible: bool) {
    let block = Block::default()
        .title(" Progress ")
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(Line::from(build_progress_line(stage, mapping_visible)));
    frame.render_widget(paragraph, inner);
}

/// Build the progress line with stage indicators
fn build_progress_line(stage: &PipelineStage, mapping_visible: bool) -> Vec<Span<'static>> {
    let stages = [
        ("Upload", StageState::upload(stage, mapping_visible)),
        ("Map Columns", StageState::mapping(stage, mapping_visible)),
        ("Analyze", StageState::analyze(stage, mapping_visible)),
        ("Results", StageState::results(stage)),
    ];

    let mut spans = Vec::new();

    for (i, (name, state)) in stages.iter().enumerate() {
        let (icon, style) = match state {
            StageState::Complete => (Icons::COMPLETE, Theme::complete()),
            StageState::Active => (Icons::ACTIVE, Theme::active()),
            StageState::Pending => (Icons::PENDING, Theme::pending()),
            StageState::Error => (Icons::ERROR, Theme::error()),
        };

        spans.push(Span::styled(format!("{} ", icon), style));
        spans.push(Span::styled(name.to_string(), style));

        if i < stages.len() - 1 {
            spans.push(Span::styled(format!(" {} ", Icons::ARROW), Theme::text_dim()));
        }
    }

    spans
}

/// State of a pipeline stage
#[derive(Debug, Clone, Copy, PartialEq)]
enum StageState {
    Pending,
    Active,
    Complete,
    Error,
}

impl StageState {
    // A failure is charged to upload until the mapping panel exists, to
    // analysis afterwards.
    fn upload(stage: &PipelineStage, mapping_visible: bool) -> Self {
        match stage {
            PipelineStage::Idle => StageState::Pending,
            PipelineStage::Uploading => StageState::Active,
            PipelineStage::Error(_) if !mapping_visible => StageState::Error,
            _ => StageState::Complete,
        }
    }

    fn mapping(stage: &PipelineStage, mapping_visible: bool) -> Self {
        match stage {
            PipelineStage::Idle | PipelineStage::Uploading => StageState::Pending,
            PipelineStage::Mapping => StageState::Active,
            PipelineStage::Error(_) if !mapping_visible => StageState::Pending,
            _ => StageState::Complete,
        }
    }

    fn analyze(stage: &PipelineStage, mapping_visible: bool) -> Self {
        match stage {
            PipelineStage::Analyzing => StageState::Active,
            PipelineStage::Complete => StageState::Complete,
            PipelineStage::Error(_) if mapping_visible => StageState::Error,
            _ => StageState::Pending,
        }
    }

    fn results(stage: &PipelineStage) -> Self {
        match stage {
            PipelineStage::Complete => StageState::Complete,
            _ => StageState::Pending,
        }
    }
}
