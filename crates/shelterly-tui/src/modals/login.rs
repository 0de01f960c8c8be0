//! Login form: email, masked password, and role.
//!
//! Authentication is local against the demo accounts, so Enter resolves
//! immediately: success dispatches `LoggedIn`, failure stays open with the
//! error and the demo hint.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use secrecy::SecretString;

use shelterly_core::Role;
use shelterly_core::session::{self, DEMO_HINT, LoginCredentials};

use super::{single_line, typed_char};
use crate::action::Action;
use crate::theme;
use crate::widgets::input::{
    hint_line, render_centered_panel, render_input_field, render_selector,
};

/// Prefill values from the active profile.
#[derive(Debug, Clone)]
pub struct LoginDefaults {
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginField {
    Email,
    Password,
    Role,
}

impl LoginField {
    const ORDER: [Self; 3] = [Self::Email, Self::Password, Self::Role];

    fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|&f| f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|&f| f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

pub struct LoginModal {
    notice: Option<String>,
    email: String,
    password: String,
    role: Role,
    field: LoginField,
    error: Option<String>,
}

impl LoginModal {
    pub fn new(defaults: &LoginDefaults, notice: Option<String>) -> Self {
        let field = if defaults.email.is_empty() {
            LoginField::Email
        } else {
            LoginField::Password
        };
        Self {
            notice,
            email: defaults.email.clone(),
            password: String::new(),
            role: defaults.role,
            field,
            error: None,
        }
    }

    fn active_input_mut(&mut self) -> Option<&mut String> {
        match self.field {
            LoginField::Email => Some(&mut self.email),
            LoginField::Password => Some(&mut self.password),
            LoginField::Role => None,
        }
    }

    fn toggle_role(&mut self) {
        self.role = match self.role {
            Role::Caseworker => Role::Admin,
            Role::Admin => Role::Caseworker,
        };
    }

    fn submit(&mut self) -> Option<Action> {
        let credentials = LoginCredentials {
            email: self.email.clone(),
            password: SecretString::from(self.password.clone()),
            role: self.role,
        };
        match session::login(&credentials) {
            Ok(session) => Some(Action::LoggedIn(session)),
            Err(e) => {
                self.error = Some(e.to_string());
                self.password.clear();
                self.field = LoginField::Password;
                None
            }
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => return Some(Action::CloseModal),
            KeyCode::Enter => return self.submit(),
            KeyCode::Tab | KeyCode::Down => self.field = self.field.next(),
            KeyCode::BackTab | KeyCode::Up => self.field = self.field.prev(),
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
                if self.field == LoginField::Role =>
            {
                self.toggle_role();
            }
            KeyCode::Backspace => {
                if let Some(input) = self.active_input_mut() {
                    input.pop();
                }
            }
            _ => {
                if let Some(c) = typed_char(&key) {
                    if let Some(input) = self.active_input_mut() {
                        input.push(c);
                    }
                }
            }
        }
        None
    }

    pub fn paste(&mut self, text: &str) {
        if let Some(input) = self.active_input_mut() {
            input.extend(single_line(text));
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let inner = render_centered_panel(frame, area, "Log in", 60, 22);

        let layout = Layout::vertical([
            Constraint::Length(2), // notice
            Constraint::Length(4), // email
            Constraint::Length(4), // password
            Constraint::Length(4), // role
            Constraint::Length(2), // error
            Constraint::Min(2),    // demo hint
            Constraint::Length(1), // key hints
        ])
        .horizontal_margin(2)
        .split(inner);

        if let Some(ref notice) = self.notice {
            frame.render_widget(
                Paragraph::new(Span::styled(notice.clone(), theme::warning_text()))
                    .wrap(Wrap { trim: true }),
                layout[0],
            );
        }

        render_input_field(
            frame,
            layout[1],
            "Email",
            &self.email,
            self.field == LoginField::Email,
            false,
        );
        render_input_field(
            frame,
            layout[2],
            "Password",
            &self.password,
            self.field == LoginField::Password,
            true,
        );
        let role_label = match self.role {
            Role::Caseworker => "Caseworker",
            Role::Admin => "Admin",
        };
        render_selector(
            frame,
            layout[3],
            "Role",
            role_label,
            self.field == LoginField::Role,
        );

        if let Some(ref error) = self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(error.clone(), theme::error_text()))
                    .wrap(Wrap { trim: true }),
                layout[4],
            );
        }

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(DEMO_HINT, theme::key_hint())))
                .wrap(Wrap { trim: true }),
            layout[5],
        );

        frame.render_widget(
            Paragraph::new(hint_line(&[
                ("Tab", "next"),
                ("\u{25C2}/\u{25B8}", "role"),
                ("Enter", "log in"),
                ("Esc", "cancel"),
            ]))
            .alignment(Alignment::Center),
            layout[6],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(modal: &mut LoginModal, text: &str) {
        for c in text.chars() {
            modal.handle_key_event(key(KeyCode::Char(c)));
        }
    }

    fn blank() -> LoginModal {
        LoginModal::new(
            &LoginDefaults {
                email: String::new(),
                role: Role::Caseworker,
            },
            None,
        )
    }

    #[test]
    fn demo_caseworker_logs_in() {
        let mut modal = blank();
        type_text(&mut modal, "demo@example.com");
        modal.handle_key_event(key(KeyCode::Tab));
        type_text(&mut modal, "password");

        let action = modal.handle_key_event(key(KeyCode::Enter));
        match action {
            Some(Action::LoggedIn(session)) => {
                assert_eq!(session.user.name, "Case Worker");
                assert_eq!(session.role(), Role::Caseworker);
            }
            other => panic!("expected LoggedIn, got {other:?}"),
        }
    }

    #[test]
    fn wrong_role_keeps_form_open_and_clears_password() {
        let mut modal = LoginModal::new(
            &LoginDefaults {
                email: "demo@example.com".into(),
                role: Role::Caseworker,
            },
            None,
        );
        // Prefilled email puts focus on the password.
        type_text(&mut modal, "password");
        modal.handle_key_event(key(KeyCode::Tab));
        modal.handle_key_event(key(KeyCode::Right));
        assert_eq!(modal.role, Role::Admin);

        assert!(modal.handle_key_event(key(KeyCode::Enter)).is_none());
        assert!(modal.error.is_some());
        assert!(modal.password.is_empty());
        assert_eq!(modal.field, LoginField::Password);
    }

    #[test]
    fn paste_drops_newlines() {
        let mut modal = blank();
        modal.paste("admin@example.com\n");
        assert_eq!(modal.email, "admin@example.com");
    }

    #[test]
    fn escape_closes() {
        let mut modal = blank();
        assert!(matches!(
            modal.handle_key_event(key(KeyCode::Esc)),
            Some(Action::CloseModal)
        ));
    }
}
