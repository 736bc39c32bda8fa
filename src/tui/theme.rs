//! Theme and Styling
//!
//! Palette and styles for the document Q&A screen. Widgets ask for a style by
//! role (question, answer, stage state) rather than by colour.

use ratatui::style::{Color, Modifier, Style};

mod palette {
    use ratatui::style::Color;

    pub const CYAN: Color = Color::Rgb(0, 212, 255);
    pub const GREEN: Color = Color::Rgb(34, 197, 94);
    pub const AMBER: Color = Color::Rgb(251, 191, 36);
    pub const RED: Color = Color::Rgb(239, 68, 68);
    pub const BLUE: Color = Color::Rgb(59, 130, 246);

    pub const GREY_100: Color = Color::Rgb(229, 229, 229);
    pub const GREY_400: Color = Color::Rgb(161, 161, 161);
    pub const GREY_700: Color = Color::Rgb(82, 82, 82);
    pub const GREY_800: Color = Color::Rgb(51, 51, 51);
}

/// Application theme
pub struct Theme;

impl Theme {
    fn fg(color: Color) -> Style {
        Style::default().fg(color)
    }

    fn bold(color: Color) -> Style {
        Self::fg(color).add_modifier(Modifier::BOLD)
    }

    // Text

    pub fn text() -> Style {
        Self::fg(palette::GREY_100)
    }

    pub fn text_secondary() -> Style {
        Self::fg(palette::GREY_400)
    }

    pub fn text_dim() -> Style {
        Self::fg(palette::GREY_700)
    }

    pub fn title() -> Style {
        Self::bold(palette::CYAN)
    }

    pub fn heading() -> Style {
        Self::bold(palette::GREY_100)
    }

    // Banners

    pub fn success() -> Style {
        Self::fg(palette::GREEN)
    }

    pub fn warning() -> Style {
        Self::fg(palette::AMBER)
    }

    pub fn error() -> Style {
        Self::fg(palette::RED)
    }

    // Frames

    pub fn border() -> Style {
        Self::fg(palette::GREY_800)
    }

    /// Border of the panel receiving key input
    pub fn border_focused() -> Style {
        Self::fg(palette::BLUE)
    }

    // History labels

    /// "Question N:" label
    pub fn question() -> Style {
        Self::bold(palette::GREEN)
    }

    /// "Answer N:" label
    pub fn answer() -> Style {
        Self::bold(palette::CYAN)
    }

    // Status bar

    pub fn shortcut_key() -> Style {
        Self::bold(palette::CYAN)
    }

    pub fn shortcut_desc() -> Style {
        Self::fg(palette::GREY_400)
    }

    // Pipeline stages

    /// Stage currently running
    pub fn active() -> Style {
        Self::bold(palette::AMBER)
    }

    pub fn complete() -> Style {
        Self::success()
    }

    pub fn pending() -> Style {
        Self::text_dim()
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
    /// Typing cursor shown while waiting for an answer
    pub const CURSOR: &'static str = "▌";
}
