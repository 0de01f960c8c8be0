//! Reservation form for one shelter: client name and caseworker notes.
//!
//! The modal owns the [`ReservationInitiator`] except while a submission
//! is in flight, when the app has lent it to a background task. The
//! initiator comes back with `ReservationFinished`.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use throbber_widgets_tui::{Throbber, ThrobberState};

use shelterly_core::{ReservationInitiator, ReservationState, Shelter};

use super::{single_line, typed_char};
use crate::action::Action;
use crate::theme;
use crate::widgets::input::{hint_line, render_centered_panel, render_input_field};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReserveField {
    Name,
    Notes,
}

pub struct ReservationModal {
    shelter: Arc<Shelter>,
    initiator: Option<ReservationInitiator>,
    name: String,
    notes: String,
    field: ReserveField,
    /// Local refusal (blank name, not logged in). Cleared on edit.
    error: Option<String>,
    throbber_state: ThrobberState,
}

impl ReservationModal {
    pub fn new(shelter: Arc<Shelter>) -> Self {
        Self {
            initiator: Some(ReservationInitiator::new(Arc::clone(&shelter))),
            shelter,
            name: String::new(),
            notes: String::new(),
            field: ReserveField::Name,
            error: None,
            throbber_state: ThrobberState::default(),
        }
    }

    /// Whether a submission is out with the background task.
    pub fn is_pending(&self) -> bool {
        self.initiator.is_none()
    }

    fn state(&self) -> Option<&ReservationState> {
        self.initiator.as_ref().map(ReservationInitiator::state)
    }

    fn can_retry(&self) -> bool {
        matches!(self.state(), Some(ReservationState::Failed(f)) if f.can_retry_reservation())
    }

    fn is_success(&self) -> bool {
        matches!(self.state(), Some(ReservationState::Success { .. }))
    }

    /// Lend the initiator to a submission. `None` while one is pending.
    pub fn take_initiator(&mut self) -> Option<ReservationInitiator> {
        self.error = None;
        self.initiator.take()
    }

    /// Take the initiator back after a submission returned.
    pub fn finish(&mut self, initiator: ReservationInitiator, error: Option<String>) {
        self.initiator = Some(initiator);
        self.error = error;
    }

    pub fn tick(&mut self) {
        if self.is_pending() {
            self.throbber_state.calc_next();
        }
    }

    fn active_input_mut(&mut self) -> &mut String {
        self.error = None;
        match self.field {
            ReserveField::Name => &mut self.name,
            ReserveField::Notes => &mut self.notes,
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        // Nothing interrupts an in-flight submission.
        if self.is_pending() {
            return None;
        }

        if self.is_success() {
            return matches!(key.code, KeyCode::Enter | KeyCode::Esc).then_some(Action::CloseModal);
        }

        // The client already exists server-side: only the bed step may be
        // repeated, never the registration.
        if self.can_retry() {
            return match key.code {
                KeyCode::Char('r') | KeyCode::Enter => Some(Action::ReservationRetry),
                KeyCode::Esc => Some(Action::CloseModal),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Esc => return Some(Action::CloseModal),
            KeyCode::Enter => {
                if self.name.trim().is_empty() {
                    self.error = Some("Client name is required".into());
                    self.field = ReserveField::Name;
                    return None;
                }
                return Some(Action::ReservationSubmit {
                    name: self.name.clone(),
                    notes: self.notes.clone(),
                });
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
                self.field = match self.field {
                    ReserveField::Name => ReserveField::Notes,
                    ReserveField::Notes => ReserveField::Name,
                };
            }
            KeyCode::Backspace => {
                self.active_input_mut().pop();
            }
            _ => {
                if let Some(c) = typed_char(&key) {
                    self.active_input_mut().push(c);
                }
            }
        }
        None
    }

    pub fn paste(&mut self, text: &str) {
        if self.is_pending() || self.is_success() || self.can_retry() {
            return;
        }
        self.active_input_mut().extend(single_line(text));
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        if self.is_pending() {
            let throbber = Throbber::default()
                .label("  Submitting reservation...")
                .style(Style::default().fg(theme::SKY_TEAL))
                .throbber_style(Style::default().fg(theme::HEARTH_ORANGE));
            frame.render_stateful_widget(throbber, area, &mut self.throbber_state.clone());
            return;
        }

        let line = if let Some(ref error) = self.error {
            Some(Span::styled(error.clone(), theme::error_text()))
        } else {
            self.initiator.as_ref().and_then(|init| {
                let style = if self.is_success() {
                    Style::default().fg(theme::OPEN_GREEN)
                } else {
                    theme::error_text()
                };
                init.message().map(|m| Span::styled(m, style))
            })
        };
        if let Some(span) = line {
            frame.render_widget(Paragraph::new(span).wrap(Wrap { trim: true }), area);
        }
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        if self.is_pending() {
            &[]
        } else if self.is_success() {
            &[("Enter", "close")]
        } else if self.can_retry() {
            &[("r", "retry bed reservation"), ("Esc", "close")]
        } else {
            &[("Tab", "next"), ("Enter", "reserve"), ("Esc", "cancel")]
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let inner = render_centered_panel(frame, area, "Reserve a bed", 64, 24);

        let layout = Layout::vertical([
            Constraint::Length(1), // shelter name
            Constraint::Length(1), // address
            Constraint::Length(2), // beds
            Constraint::Length(4), // client name
            Constraint::Length(4), // notes
            Constraint::Length(1), // spacer
            Constraint::Min(2),    // status
            Constraint::Length(1), // key hints
        ])
        .horizontal_margin(2)
        .split(inner);

        frame.render_widget(
            Paragraph::new(Span::styled(self.shelter.name.clone(), theme::title_style())),
            layout[0],
        );
        frame.render_widget(
            Paragraph::new(Span::styled(
                self.shelter.address.one_line(),
                Style::default().fg(theme::TEXT),
            )),
            layout[1],
        );
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Beds available: ", theme::key_hint()),
                Span::styled(
                    format!(
                        "{}/{}",
                        self.shelter.current_availability, self.shelter.total_capacity
                    ),
                    theme::availability(
                        self.shelter.has_availability(),
                        self.shelter.is_low_availability(),
                    ),
                ),
            ])),
            layout[2],
        );

        let editable = !self.is_pending() && !self.is_success() && !self.can_retry();
        render_input_field(
            frame,
            layout[3],
            "Client name",
            &self.name,
            editable && self.field == ReserveField::Name,
            false,
        );
        render_input_field(
            frame,
            layout[4],
            "Caseworker notes (optional)",
            &self.notes,
            editable && self.field == ReserveField::Notes,
            false,
        );

        self.render_status(frame, layout[6]);

        frame.render_widget(
            Paragraph::new(hint_line(self.hints())).alignment(Alignment::Center),
            layout[7],
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use shelterly_core::model::Address;
    use shelterly_core::{Client, ClientStatus, CoreError, RecordId, ReservationStage, ShelterType};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn shelter() -> Arc<Shelter> {
        Arc::new(Shelter {
            id: RecordId::Numeric(1),
            name: "Casa A".into(),
            address: Address {
                line1: "123 San Fernando Rd".into(),
                line2: None,
                city: "San Jose".into(),
                state: "CA".into(),
                zip: "95112".into(),
            },
            latitude: 0.0,
            longitude: 0.0,
            total_capacity: 10,
            current_availability: 3,
            shelter_type: Some(ShelterType::Congregate),
            allows_pets: false,
            allows_partner: false,
            active: true,
            phone: None,
            email: None,
            operating_organization: None,
            description: None,
            last_updated: None,
        })
    }

    fn client() -> Client {
        Client {
            id: RecordId::Numeric(9),
            name: Some("Ana".into()),
            pseudonym: None,
            status: ClientStatus::SeekingPlacement,
            current_shelter_id: None,
            current_shelter_name: None,
            registration_date: None,
            last_activity_date: None,
            caseworker_notes: None,
        }
    }

    #[test]
    fn blank_name_is_refused_locally() {
        let mut modal = ReservationModal::new(shelter());
        modal.handle_key_event(key(KeyCode::Char(' ')));
        assert!(modal.handle_key_event(key(KeyCode::Enter)).is_none());
        assert_eq!(modal.error.as_deref(), Some("Client name is required"));
        assert!(!modal.is_pending());
    }

    #[test]
    fn enter_submits_name_and_notes() {
        let mut modal = ReservationModal::new(shelter());
        modal.paste("Ana");
        modal.handle_key_event(key(KeyCode::Tab));
        modal.paste("needs lower bunk");

        match modal.handle_key_event(key(KeyCode::Enter)) {
            Some(Action::ReservationSubmit { name, notes }) => {
                assert_eq!(name, "Ana");
                assert_eq!(notes, "needs lower bunk");
            }
            other => panic!("expected ReservationSubmit, got {other:?}"),
        }
    }

    #[test]
    fn pending_submission_ignores_keys() {
        let mut modal = ReservationModal::new(shelter());
        let initiator = modal.take_initiator();
        assert!(initiator.is_some());
        assert!(modal.take_initiator().is_none());
        assert!(modal.handle_key_event(key(KeyCode::Esc)).is_none());
        assert!(modal.handle_key_event(key(KeyCode::Enter)).is_none());
    }

    #[test]
    fn bed_failure_offers_only_retry() {
        let mut modal = ReservationModal::new(shelter());
        let mut initiator = modal.take_initiator().unwrap();
        let _ = initiator.begin_submit("Ana");
        initiator.fail(
            ReservationStage::BedReservation { client: client() },
            &CoreError::Timeout,
        );
        modal.finish(initiator, None);

        assert!(modal.can_retry());
        assert!(matches!(
            modal.handle_key_event(key(KeyCode::Enter)),
            Some(Action::ReservationRetry)
        ));
        // Typing does not reopen the form.
        assert!(modal.handle_key_event(key(KeyCode::Char('x'))).is_none());
        assert!(modal.name.is_empty());
    }

    #[test]
    fn success_closes_on_enter() {
        let mut modal = ReservationModal::new(shelter());
        let mut initiator = ReservationInitiator::new(shelter());
        let _ = initiator.begin_submit("Ana");
        initiator.succeed(client());
        modal.finish(initiator, None);

        assert!(matches!(
            modal.handle_key_event(key(KeyCode::Enter)),
            Some(Action::CloseModal)
        ));
    }
}
