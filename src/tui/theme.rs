//! Theme and Styling
//!
//! Defines colors and styles for the TUI interface.

use ratatui::style::{Color, Modifier, Style};

/// Application theme
pub struct Theme;

impl Theme {
    // === Primary Colors ===

    /// Primary accent color (cyan/teal)
    pub const ACCENT: Color = Color::Rgb(0, 212, 255);

    /// Secondary accent (green)
    pub const SUCCESS: Color = Color::Rgb(34, 197, 94);

    /// Warning color (yellow/amber)
    pub const WARNING: Color = Color::Rgb(251, 191, 36);

    /// Error color (red)
    pub const ERROR: Color = Color::Rgb(239, 68, 68);

    /// Informational alerts (blue)
    pub const INFO: Color = Color::Rgb(59, 130, 246);

    // === Text Colors ===

    /// Primary text color
    pub const TEXT_PRIMARY: Color = Color::Rgb(229, 229, 229);

    /// Secondary text color (muted)
    pub const TEXT_SECONDARY: Color = Color::Rgb(161, 161, 161);

    /// Dimmed text
    pub const TEXT_DIM: Color = Color::Rgb(82, 82, 82);

    // === Background Colors ===

    /// Highlighted/selected background
    pub const BG_HIGHLIGHT: Color = Color::Rgb(38, 38, 38);

    // === Border Colors ===

    /// Default border color
    pub const BORDER: Color = Color::Rgb(51, 51, 51);

    /// Focused border color
    pub const BORDER_FOCUSED: Color = Color::Rgb(59, 130, 246);

    // === Series Colors ===

    pub const TEAL: Color = Color::Rgb(75, 192, 192);
    pub const BLUE: Color = Color::Rgb(54, 162, 235);
    pub const RED: Color = Color::Rgb(255, 99, 132);
    pub const PURPLE: Color = Color::Rgb(153, 102, 255);
    pub const ORANGE: Color = Color::Rgb(255, 159, 64);
    pub const YELLOW: Color = Color::Rgb(255, 206, 86);

    // === Styles ===

    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    /// Secondary/muted text style
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Dimmed text style
    pub fn text_dim() -> Style {
        Style::default().fg(Self::TEXT_DIM)
    }

    /// Title style
    pub fn title() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Heading style
    pub fn heading() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Metric value style
    pub fn metric_value() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Success style
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    /// Error style
    pub fn error() -> Style {
        Style::default().fg(Self::ERROR)
    }

    /// Informational style
    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    /// Default border style
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Focused border style
    pub fn border_focused() -> Style {
        Style::default().fg(Self::BORDER_FOCUSED)
    }

    /// Border for a panel that may hold focus
    pub fn panel_border(focused: bool) -> Style {
        if focused {
            Self::border_focused()
        } else {
            Self::border()
        }
    }

    /// Selected item style
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .bg(Self::BG_HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Keyboard shortcut style
    pub fn shortcut_key() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Shortcut description style
    pub fn shortcut_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Active/in-progress indicator
    pub fn active() -> Style {
        Style::default()
            .fg(Self::WARNING)
            .add_modifier(Modifier::BOLD)
    }

    /// Complete indicator
    pub fn complete() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    /// Pending indicator
    pub fn pending() -> Style {
        Style::default().fg(Self::TEXT_DIM)
    }

    /// Input placeholder style
    pub fn placeholder() -> Style {
        Style::default().fg(Self::TEXT_DIM)
    }

    /// Badge style for the selected file
    pub fn badge_success() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Self::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    /// Color of a bar or line series; `index` 0 is the left axis
    pub fn series(panel: crate::dashboard::PanelId, index: usize) -> Color {
        use crate::dashboard::PanelId;

        match (panel, index) {
            (PanelId::TopCustomers, _) => Self::TEAL,
            (PanelId::MonthlySales, _) => Self::TEAL,
            (PanelId::TopProducts, _) => Self::BLUE,
            (PanelId::SalesByCountry, _) => Self::RED,
            (PanelId::SalesByDay, _) => Self::PURPLE,
            (PanelId::SalesByHour, _) => Self::ORANGE,
            (PanelId::AovByMonth, _) => Self::YELLOW,
            (PanelId::SalesAndAovByMonth, 0) => Self::TEAL,
            (PanelId::SalesAndAovByMonth, _) => Self::YELLOW,
        }
    }
}

/// Progress stage icons
pub struct Icons;

impl Icons {
    pub const COMPLETE: &'static str = "✓";
    pub const ACTIVE: &'static str = "●";
    pub const PENDING: &'static str = "○";
    pub const ERROR: &'static str = "✗";
    pub const ARROW: &'static str = "→";
    pub const SELECTED: &'static str = "▶";
    pub const DOT: &'static str = "•";
    pub const FILE: &'static str = "📄";
    pub const SPINNER: [&'static str; 4] = ["◐", "◓", "◑", "◒"];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::PanelId;

    #[test]
    fn test_series_colors() {
        assert_eq!(Theme::series(PanelId::TopCustomers, 0), Theme::TEAL);
        assert_eq!(Theme::series(PanelId::MonthlySales, 0), Theme::TEAL);
        assert_eq!(Theme::series(PanelId::TopProducts, 0), Theme::BLUE);
        assert_eq!(Theme::series(PanelId::SalesByCountry, 0), Theme::RED);
        assert_eq!(Theme::series(PanelId::SalesByDay, 0), Theme::PURPLE);
        assert_eq!(Theme::series(PanelId::SalesByHour, 0), Theme::ORANGE);
        assert_eq!(Theme::series(PanelId::AovByMonth, 0), Theme::YELLOW);
        assert_eq!(Theme::series(PanelId::SalesAndAovByMonth, 0), Theme::TEAL);
        assert_eq!(Theme::series(PanelId::SalesAndAovByMonth, 1), Theme::YELLOW);
    }
}
