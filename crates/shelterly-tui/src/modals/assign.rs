//! Assign an open task to a client by id.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use throbber_widgets_tui::{Throbber, ThrobberState};

use shelterly_core::RecordId;

use super::{single_line, typed_char};
use crate::action::Action;
use crate::theme;
use crate::widgets::input::{hint_line, render_centered_panel, render_input_field};

pub struct AssignModal {
    task_id: RecordId,
    title: String,
    client_id: String,
    error: Option<String>,
    pending: bool,
    throbber_state: ThrobberState,
}

impl AssignModal {
    pub fn new(task_id: RecordId, title: String) -> Self {
        Self {
            task_id,
            title,
            client_id: String::new(),
            error: None,
            pending: false,
            throbber_state: ThrobberState::default(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The backend refused; keep the input so it can be corrected.
    pub fn fail(&mut self, message: String) {
        self.pending = false;
        self.error = Some(message);
    }

    pub fn tick(&mut self) {
        if self.pending {
            self.throbber_state.calc_next();
        }
    }

    fn submit(&mut self) -> Option<Action> {
        let client_id = self.client_id.trim();
        if client_id.is_empty() {
            self.error = Some("Client id is required".into());
            return None;
        }
        self.error = None;
        self.pending = true;
        Some(Action::AssignSubmit {
            id: self.task_id.clone(),
            client_id: client_id.to_owned(),
        })
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        if self.pending {
            return None;
        }
        match key.code {
            KeyCode::Esc => return Some(Action::CloseModal),
            KeyCode::Enter => return self.submit(),
            KeyCode::Backspace => {
                self.client_id.pop();
            }
            _ => {
                if let Some(c) = typed_char(&key) {
                    self.client_id.push(c);
                }
            }
        }
        None
    }

    pub fn paste(&mut self, text: &str) {
        if !self.pending {
            self.client_id.extend(single_line(text));
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let inner = render_centered_panel(frame, area, "Assign task", 56, 13);

        let layout = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(4),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .horizontal_margin(2)
        .split(inner);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Task  ", theme::key_hint()),
                Span::styled(self.title.clone(), Style::default().fg(theme::SKY_TEAL)),
            ]))
            .wrap(Wrap { trim: true }),
            layout[0],
        );

        render_input_field(frame, layout[1], "Client id", &self.client_id, !self.pending, false);

        if self.pending {
            let throbber = Throbber::default()
                .label("  Assigning...")
                .style(Style::default().fg(theme::SKY_TEAL))
                .throbber_style(Style::default().fg(theme::HEARTH_ORANGE));
            frame.render_stateful_widget(throbber, layout[2], &mut self.throbber_state.clone());
        } else if let Some(ref error) = self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(error.clone(), theme::error_text()))
                    .wrap(Wrap { trim: true }),
                layout[2],
            );
        }

        if !self.pending {
            frame.render_widget(
                Paragraph::new(hint_line(&[("Enter", "assign"), ("Esc", "cancel")]))
                    .alignment(Alignment::Center),
                layout[4],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn modal() -> AssignModal {
        AssignModal::new(RecordId::Numeric(7), "Park cleanup".into())
    }

    #[test]
    fn blank_client_id_is_refused_locally() {
        let mut modal = modal();
        modal.paste("   ");
        assert!(modal.handle_key_event(key(KeyCode::Enter)).is_none());
        assert_eq!(modal.error.as_deref(), Some("Client id is required"));
        assert!(!modal.pending);
    }

    #[test]
    fn submit_trims_and_locks_input() {
        let mut modal = modal();
        modal.paste(" 42\n");
        match modal.handle_key_event(key(KeyCode::Enter)) {
            Some(Action::AssignSubmit { id, client_id }) => {
                assert_eq!(id, RecordId::Numeric(7));
                assert_eq!(client_id, "42");
            }
            other => panic!("expected AssignSubmit, got {other:?}"),
        }
        assert!(modal.handle_key_event(key(KeyCode::Esc)).is_none());
        assert!(modal.handle_key_event(key(KeyCode::Char('9'))).is_none());
        assert_eq!(modal.client_id, " 42");
    }

    #[test]
    fn backend_failure_reopens_the_form() {
        let mut modal = modal();
        modal.paste("42");
        modal.handle_key_event(key(KeyCode::Enter));
        modal.fail("Task not found".into());
        assert!(!modal.pending);
        assert_eq!(modal.error.as_deref(), Some("Task not found"));
        assert!(matches!(
            modal.handle_key_event(key(KeyCode::Esc)),
            Some(Action::CloseModal)
        ));
    }
}
