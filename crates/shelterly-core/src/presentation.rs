// ── Presentation rules ──
//
// Surface-independent derivations shared by the CLI and the TUI: whether
// the reserve control is usable, and the low-availability flag.

use std::sync::Arc;

use crate::model::Shelter;
use crate::session::Session;

/// State of a shelter's reserve control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveControl {
    /// Beds free and a session is present.
    Enabled,
    /// Beds free but nobody is logged in: opens the login prompt.
    RequiresLogin,
    /// No free bed. Hard rule regardless of session.
    Disabled,
}

impl ReserveControl {
    pub fn for_shelter(shelter: &Shelter, session: Option<&Session>) -> Self {
        if !shelter.has_availability() {
            Self::Disabled
        } else if session.is_some() {
            Self::Enabled
        } else {
            Self::RequiresLogin
        }
    }
}

/// A shelter plus everything a surface needs to render it.
#[derive(Debug, Clone)]
pub struct ShelterView {
    pub shelter: Arc<Shelter>,
    pub reserve: ReserveControl,
    pub low_availability: bool,
}

impl ShelterView {
    pub fn new(shelter: Arc<Shelter>, session: Option<&Session>) -> Self {
        let reserve = ReserveControl::for_shelter(&shelter, session);
        let low_availability = shelter.is_low_availability();
        Self {
            shelter,
            reserve,
            low_availability,
        }
    }

    /// Build views for a whole snapshot.
    pub fn from_list(shelters: &[Arc<Shelter>], session: Option<&Session>) -> Vec<Self> {
        shelters
            .iter()
            .map(|s| Self::new(Arc::clone(s), session))
            .collect()
    }

    /// `"{availability}/{capacity} beds"`.
    pub fn occupancy_label(&self) -> String {
        format!(
            "{}/{} beds",
            self.shelter.current_availability, self.shelter.total_capacity
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Address, RecordId, ShelterType};
    use crate::session::{LoginCredentials, Role, login};
    use secrecy::SecretString;

    fn shelter(availability: i64) -> Arc<Shelter> {
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
            current_availability: availability,
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

    fn session() -> Session {
        login(&LoginCredentials {
            email: "demo@example.com".into(),
            password: SecretString::from("password".to_owned()),
            role: Role::Caseworker,
        })
        .unwrap()
    }

    #[test]
    fn reserve_disabled_iff_no_availability() {
        let s = session();
        assert_eq!(ShelterView::new(shelter(1), Some(&s)).reserve, ReserveControl::Enabled);
        assert_eq!(ShelterView::new(shelter(0), Some(&s)).reserve, ReserveControl::Disabled);
        assert_eq!(ShelterView::new(shelter(-2), Some(&s)).reserve, ReserveControl::Disabled);
    }

    #[test]
    fn anonymous_viewer_is_sent_to_login() {
        assert_eq!(ShelterView::new(shelter(3), None).reserve, ReserveControl::RequiresLogin);
        assert_eq!(ShelterView::new(shelter(0), None).reserve, ReserveControl::Disabled);
    }

    #[test]
    fn refetch_from_one_to_zero_disables_again() {
        let s = session();
        let before = ShelterView::new(shelter(1), Some(&s));
        let after = ShelterView::new(shelter(0), Some(&s));
        assert_eq!(before.reserve, ReserveControl::Enabled);
        assert_eq!(after.reserve, ReserveControl::Disabled);
        assert!(after.low_availability);
        assert_eq!(after.occupancy_label(), "0/10 beds");
    }
}
