// ── Reservation workflow ──
//
// Two-step commit: register a client, then reserve one bed for them.
// `ReservationInitiator` is the per-modal state machine; the network side
// lives in `Console::submit_reservation`.
//
//   Idle ──submit──▶ Submitting ──▶ Success
//                         │
//                         └──────▶ Failed { stage } ──retry (bed stage only)──▶ Submitting

use std::sync::Arc;

use tracing::warn;

use crate::error::CoreError;
use crate::model::{Client, Shelter};

/// The only message a user sees for a failed reservation, whatever the cause.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to register client. Please try again.";

/// Which step of the workflow failed.
#[derive(Debug, Clone, PartialEq)]
pub enum ReservationStage {
    /// Nothing was created on the backend.
    ClientCreation,
    /// The client exists server-side with no shelter link.
    BedReservation { client: Client },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReservationFailure {
    pub stage: ReservationStage,
    /// Underlying error text, for logs. Never shown in place of the
    /// generic message.
    pub detail: String,
}

impl ReservationFailure {
    pub fn message(&self) -> &'static str {
        GENERIC_FAILURE_MESSAGE
    }

    /// Only the bed step can be retried on its own.
    pub fn can_retry_reservation(&self) -> bool {
        matches!(self.stage, ReservationStage::BedReservation { .. })
    }

    /// The orphaned client left behind by a bed-step failure.
    pub fn orphaned_client(&self) -> Option<&Client> {
        match &self.stage {
            ReservationStage::BedReservation { client } => Some(client),
            ReservationStage::ClientCreation => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ReservationState {
    #[default]
    Idle,
    Submitting,
    Success {
        client: Client,
    },
    Failed(ReservationFailure),
}

/// State machine for one reservation modal, bound to one shelter.
#[derive(Debug, Clone)]
pub struct ReservationInitiator {
    shelter: Arc<Shelter>,
    state: ReservationState,
}

impl ReservationInitiator {
    pub fn new(shelter: Arc<Shelter>) -> Self {
        Self {
            shelter,
            state: ReservationState::Idle,
        }
    }

    pub fn shelter(&self) -> &Arc<Shelter> {
        &self.shelter
    }

    pub fn state(&self) -> &ReservationState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, ReservationState::Submitting)
    }

    /// User-facing message for the current state, if any.
    pub fn message(&self) -> Option<String> {
        match &self.state {
            ReservationState::Idle | ReservationState::Submitting => None,
            ReservationState::Success { client } => Some(format!(
                "Reserved a bed at {} for {}",
                self.shelter.name,
                client.display_name()
            )),
            ReservationState::Failed(failure) => Some(failure.message().to_owned()),
        }
    }

    /// Validate the name and enter `Submitting`. Returns the trimmed name.
    ///
    /// An empty name leaves the state untouched. A second submit while one
    /// is in flight is rejected.
    pub fn begin_submit(&mut self, name: &str) -> Result<String, CoreError> {
        if self.is_submitting() {
            return Err(CoreError::ReservationInProgress);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "Client name is required".into(),
            });
        }
        self.state = ReservationState::Submitting;
        Ok(name.to_owned())
    }

    /// Enter `Submitting` for a bed-only retry. Returns the already-created
    /// client so no duplicate is registered.
    pub fn begin_retry(&mut self) -> Result<Client, CoreError> {
        let client = match &self.state {
            ReservationState::Submitting => return Err(CoreError::ReservationInProgress),
            ReservationState::Failed(failure) => failure.orphaned_client().cloned(),
            ReservationState::Idle | ReservationState::Success { .. } => None,
        };
        let client = client.ok_or_else(|| CoreError::ValidationFailed {
            message: "Nothing to retry: no client is awaiting a bed".into(),
        })?;
        self.state = ReservationState::Submitting;
        Ok(client)
    }

    pub fn succeed(&mut self, client: Client) {
        self.state = ReservationState::Success { client };
    }

    pub fn fail(&mut self, stage: ReservationStage, error: &CoreError) {
        warn!(
            shelter = %self.shelter.id,
            ?stage,
            error = %error,
            "reservation failed"
        );
        self.state = ReservationState::Failed(ReservationFailure {
            stage,
            detail: error.to_string(),
        });
    }

    /// Back to `Idle` (modal closed or reopened).
    pub fn reset(&mut self) {
        self.state = ReservationState::Idle;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Address, ClientStatus, RecordId, ShelterType};

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
            current_availability: 1,
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
            id: RecordId::Numeric(42),
            name: Some("J. Doe".into()),
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
    fn blank_name_is_rejected_before_submitting() {
        let mut r = ReservationInitiator::new(shelter());
        let err = r.begin_submit("   ").unwrap_err();
        assert!(matches!(err, CoreError::ValidationFailed { .. }));
        assert_eq!(r.state(), &ReservationState::Idle);
    }

    #[test]
    fn second_submit_while_in_flight_is_rejected() {
        let mut r = ReservationInitiator::new(shelter());
        assert_eq!(r.begin_submit("  J. Doe ").unwrap(), "J. Doe");
        assert!(matches!(
            r.begin_submit("J. Doe").unwrap_err(),
            CoreError::ReservationInProgress
        ));
    }

    #[test]
    fn every_failure_shows_the_generic_message() {
        let mut r = ReservationInitiator::new(shelter());
        r.begin_submit("J. Doe").unwrap();
        r.fail(ReservationStage::ClientCreation, &CoreError::Timeout);
        assert_eq!(r.message().as_deref(), Some(GENERIC_FAILURE_MESSAGE));

        let mut r = ReservationInitiator::new(shelter());
        r.begin_submit("J. Doe").unwrap();
        r.fail(
            ReservationStage::BedReservation { client: client() },
            &CoreError::Api {
                message: "Reservation failed".into(),
                status: Some(400),
            },
        );
        assert_eq!(r.message().as_deref(), Some(GENERIC_FAILURE_MESSAGE));
    }

    #[test]
    fn retry_only_from_bed_stage() {
        let mut r = ReservationInitiator::new(shelter());
        assert!(r.begin_retry().is_err());

        r.begin_submit("J. Doe").unwrap();
        r.fail(ReservationStage::ClientCreation, &CoreError::Timeout);
        assert!(r.begin_retry().is_err());

        r.begin_submit("J. Doe").unwrap();
        r.fail(
            ReservationStage::BedReservation { client: client() },
            &CoreError::Timeout,
        );
        let retried = r.begin_retry().unwrap();
        assert_eq!(retried.id, RecordId::Numeric(42));
        assert!(r.is_submitting());
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut r = ReservationInitiator::new(shelter());
        r.begin_submit("J. Doe").unwrap();
        r.succeed(client());
        assert!(r.message().unwrap().contains("J. Doe"));
        r.reset();
        assert_eq!(r.state(), &ReservationState::Idle);
    }
}
