// ── Typed request structs for Command payloads ──
//
// Drafts are produced by `validation` from raw form input and carried by
// the admin commands. They convert into wire request bodies at the edge.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use shelterly_api::types;

use crate::model::ShelterType;

// ── Shelters ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ShelterDraft {
    pub name: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub latitude: f64,
    pub longitude: f64,
    pub total_capacity: i64,
    pub current_availability: i64,
    pub shelter_type: Option<ShelterType>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub operating_organization: Option<String>,
    pub description: Option<String>,
    pub allows_pets: bool,
    pub allows_partner: bool,
    pub is_active: bool,
}

impl ShelterDraft {
    pub(crate) fn to_wire(&self) -> types::ShelterRequest {
        types::ShelterRequest {
            name: self.name.clone(),
            address_line1: self.address_line1.clone(),
            address_line2: self.address_line2.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip_code: self.zip.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            total_capacity: self.total_capacity,
            current_availability: self.current_availability,
            shelter_type: self.shelter_type.map(|t| t.as_wire().to_owned()),
            phone: self.phone.clone(),
            email: self.email.clone(),
            operating_organization: self.operating_organization.clone(),
            description: self.description.clone(),
            allows_pets: self.allows_pets,
            allows_partner: self.allows_partner,
            is_active: self.is_active,
        }
    }
}

// ── Tasks ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub scheduled_at: Option<NaiveDateTime>,
    pub estimated_duration: String,
    pub compensation_details: String,
    pub contact_name: String,
    pub contact_phone: Option<String>,
}

impl TaskDraft {
    pub(crate) fn to_wire(&self) -> types::TaskRequest {
        types::TaskRequest {
            title: self.title.clone(),
            description: Some(self.description.clone()),
            location: Some(self.location.clone()),
            task_date_time: self
                .scheduled_at
                .map(|t| t.format("%Y-%m-%dT%H:%M:%S").to_string()),
            estimated_duration: Some(self.estimated_duration.clone()),
            compensation_details: Some(self.compensation_details.clone()),
            task_contact_name: Some(self.contact_name.clone()),
            task_contact_phone: self.contact_phone.clone(),
        }
    }
}
