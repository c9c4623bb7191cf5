//! Palette and shared text styles.

use ratatui::style::{Color, Modifier, Style};

/// Frames for the loading spinner, advanced once per UI tick.
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Brand color for the daily-ops console.
pub const ACCENT: Color = Color::Rgb(0x38, 0xbd, 0xf8);
pub const CYAN: Color = Color::Rgb(0x22, 0xd3, 0xee);
pub const GREEN: Color = Color::Rgb(0x4a, 0xde, 0x80);
pub const RED: Color = Color::Rgb(0xf8, 0x71, 0x71);
pub const YELLOW: Color = Color::Rgb(0xfa, 0xcc, 0x15);
pub const PURPLE: Color = Color::Rgb(0xc0, 0x84, 0xfc);
pub const TEXT: Color = Color::Rgb(0xe2, 0xe8, 0xf0);
pub const TEXT_TERTIARY: Color = Color::Rgb(0x64, 0x74, 0x8b);
pub const BG_CARD: Color = Color::Rgb(0x1e, 0x29, 0x3b);

pub fn title_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn dim_style() -> Style {
    Style::default().fg(TEXT_TERTIARY)
}

pub fn hint_style() -> Style {
    Style::default()
        .fg(TEXT_TERTIARY)
        .add_modifier(Modifier::ITALIC)
}

pub fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_active() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(TEXT_TERTIARY).bg(BG_CARD)
}
