//! Palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Palette ───────────────────────────────────────────────────────────

pub const HEARTH_ORANGE: Color = Color::Rgb(255, 159, 67); // #ff9f43
pub const SKY_TEAL: Color = Color::Rgb(94, 214, 204); // #5ed6cc
pub const DUSK_ROSE: Color = Color::Rgb(232, 120, 150); // #e87896
pub const LAMP_YELLOW: Color = Color::Rgb(250, 214, 105); // #fad669
pub const OPEN_GREEN: Color = Color::Rgb(120, 220, 120); // #78dc78
pub const FULL_RED: Color = Color::Rgb(240, 90, 90); // #f05a5a

pub const TEXT: Color = Color::Rgb(205, 205, 198); // #cdcdc6
pub const MUTED: Color = Color::Rgb(112, 120, 138); // #70788a
pub const BG_SELECTED: Color = Color::Rgb(44, 48, 58); // #2c303a
pub const BG_PANEL: Color = Color::Rgb(26, 28, 34); // #1a1c22

// ── Semantic Styles ───────────────────────────────────────────────────

fn bold(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

pub fn title_style() -> Style {
    bold(SKY_TEAL)
}

pub fn border_focused() -> Style {
    Style::default().fg(HEARTH_ORANGE)
}

pub fn border_default() -> Style {
    Style::default().fg(MUTED)
}

pub fn table_header() -> Style {
    bold(SKY_TEAL).add_modifier(Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(TEXT)
}

pub fn table_selected() -> Style {
    bold(HEARTH_ORANGE).bg(BG_SELECTED)
}

pub fn tab_active() -> Style {
    bold(HEARTH_ORANGE)
}

pub fn tab_inactive() -> Style {
    table_row()
}

/// Hint labels in the status bar and panels.
pub fn key_hint() -> Style {
    border_default()
}

/// The key half of a hint pair.
pub fn key_hint_key() -> Style {
    bold(SKY_TEAL)
}

pub fn error_text() -> Style {
    Style::default().fg(FULL_RED)
}

pub fn warning_text() -> Style {
    Style::default().fg(LAMP_YELLOW)
}

/// Bed count coloring: red when full, yellow when low, green otherwise.
pub fn availability(has_beds: bool, low: bool) -> Style {
    let color = match (has_beds, low) {
        (false, _) => FULL_RED,
        (true, true) => LAMP_YELLOW,
        (true, false) => OPEN_GREEN,
    };
    Style::default().fg(color)
}
