//! Form primitives shared by the login and reservation modals and the
//! search-flags panel: a centered panel, text inputs, an inline selector,
//! toggles, and a key-hint line.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::theme;

/// Clear a centered rectangle, draw a titled rounded border around it, and
/// return the inner area.
pub fn render_centered_panel(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    width: u16,
    height: u16,
) -> Rect {
    render_panel(frame, area, title, (width, height), theme::border_focused())
}

/// [`render_centered_panel`] with a caller-chosen border style.
pub fn render_panel(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    (width, height): (u16, u16),
    border: Style,
) -> Rect {
    let panel_w = width.min(area.width.saturating_sub(4));
    let panel_h = height.min(area.height.saturating_sub(2));
    let x = (area.width.saturating_sub(panel_w)) / 2;
    let y = (area.height.saturating_sub(panel_h)) / 2;
    let panel = Rect::new(area.x + x, area.y + y, panel_w, panel_h);

    frame.render_widget(Clear, panel);
    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_PANEL)),
        panel,
    );

    let block = Block::default()
        .title(Line::from(vec![
            Span::raw(" "),
            Span::styled(title.to_owned(), theme::title_style()),
            Span::raw(" "),
        ]))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border);

    let inner = block.inner(panel);
    frame.render_widget(block, panel);
    inner
}

fn label_style(active: bool) -> Style {
    if active {
        Style::default().fg(theme::SKY_TEAL)
    } else {
        Style::default().fg(theme::TEXT)
    }
}

fn field_block(frame: &mut Frame, area: Rect, active: bool) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if active {
            theme::border_focused()
        } else {
            theme::border_default()
        });
    let block_area = Rect::new(area.x, area.y + 1, area.width, 3.min(area.height.saturating_sub(1)));
    let inner = block.inner(block_area);
    frame.render_widget(block, block_area);
    inner
}

/// Label line plus a boxed single-line input. Needs 4 rows.
pub fn render_input_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    active: bool,
    masked: bool,
) {
    if area.height < 3 {
        return;
    }

    frame.render_widget(
        Paragraph::new(Span::styled(label.to_owned(), label_style(active))),
        Rect::new(area.x, area.y, area.width, 1),
    );

    let display = if masked && !value.is_empty() {
        "\u{25CF}".repeat(value.chars().count())
    } else {
        value.to_owned()
    };

    let inner = field_block(frame, area, active);
    let text = if active {
        format!("{display}\u{2588}")
    } else {
        display
    };
    frame.render_widget(
        Paragraph::new(Span::styled(text, Style::default().fg(theme::SKY_TEAL))),
        inner,
    );
}

/// Label line plus a boxed `◂ value ▸` selector. Needs 4 rows.
pub fn render_selector(frame: &mut Frame, area: Rect, label: &str, value: &str, active: bool) {
    if area.height < 3 {
        return;
    }

    frame.render_widget(
        Paragraph::new(Span::styled(label.to_owned(), label_style(active))),
        Rect::new(area.x, area.y, area.width, 1),
    );

    let inner = field_block(frame, area, active);
    let arrow_style = if active {
        Style::default().fg(theme::HEARTH_ORANGE)
    } else {
        Style::default().fg(theme::MUTED)
    };
    let value_style = if active {
        Style::default()
            .fg(theme::SKY_TEAL)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme::TEXT)
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" \u{25C2} ", arrow_style),
            Span::styled(value.to_owned(), value_style),
            Span::styled(" \u{25B8}", arrow_style),
        ])),
        inner,
    );
}

/// `[✓] label` on a single row.
pub fn render_toggle(frame: &mut Frame, area: Rect, label: &str, value: bool, active: bool) {
    if area.height < 1 {
        return;
    }
    let marker = if value { "[\u{2713}]" } else { "[ ]" };
    let marker_style = if active {
        Style::default().fg(theme::HEARTH_ORANGE)
    } else if value {
        Style::default().fg(theme::OPEN_GREEN)
    } else {
        Style::default().fg(theme::MUTED)
    };

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("  {marker} "), marker_style),
            Span::styled(label.to_owned(), label_style(active)),
        ])),
        area,
    );
}

/// `key action  key action` hint line.
pub fn hint_line(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (i, (key, label)) in hints.iter().enumerate() {
        let sep = if i == 0 { "" } else { "  " };
        spans.push(Span::styled(format!("{sep}{key}"), theme::key_hint_key()));
        spans.push(Span::styled(format!(" {label}"), theme::key_hint()));
    }
    Line::from(spans)
}
