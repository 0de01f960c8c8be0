//! Overlay forms that capture all input while open.

pub mod assign;
pub mod login;
pub mod reservation;

use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::action::Action;

pub use assign::AssignModal;
pub use login::{LoginDefaults, LoginModal};
pub use reservation::ReservationModal;

pub enum Modal {
    Login(LoginModal),
    Reservation(ReservationModal),
    Assign(AssignModal),
}

impl Modal {
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        match self {
            Self::Login(m) => m.handle_key_event(key),
            Self::Reservation(m) => m.handle_key_event(key),
            Self::Assign(m) => m.handle_key_event(key),
        }
    }

    pub fn paste(&mut self, text: &str) {
        match self {
            Self::Login(m) => m.paste(text),
            Self::Reservation(m) => m.paste(text),
            Self::Assign(m) => m.paste(text),
        }
    }

    pub fn tick(&mut self) {
        match self {
            Self::Reservation(m) => m.tick(),
            Self::Assign(m) => m.tick(),
            Self::Login(_) => {}
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match self {
            Self::Login(m) => m.render(frame, area),
            Self::Reservation(m) => m.render(frame, area),
            Self::Assign(m) => m.render(frame, area),
        }
    }
}

/// Printable character without Ctrl/Alt, for text fields.
fn typed_char(key: &KeyEvent) -> Option<char> {
    use crossterm::event::{KeyCode, KeyModifiers};
    match key.code {
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            Some(c)
        }
        _ => None,
    }
}

/// Pasted text with line breaks dropped; every field is single-line.
fn single_line(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().filter(|c| *c != '\n' && *c != '\r')
}
