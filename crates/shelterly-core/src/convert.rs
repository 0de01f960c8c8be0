// ── API-to-domain type conversions ──
//
// Bridges raw `shelterly_api` response types into canonical
// `shelterly_core::model` domain types. Enumerations and timestamps arrive
// as strings; unknown values degrade to a fallback variant or `None`.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime};

use shelterly_api::types;

use crate::model::{
    Address, Client, ClientStatus, RecordId, Shelter, ShelterSummary, ShelterType,
    ShelterTypeSummary, Task, TaskStatus, TaskSummary,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse a backend timestamp. Local date-times (`2025-04-12T09:30:00`,
/// optional fraction) are the norm; RFC 3339 values keep their wall time.
pub(crate) fn parse_timestamp(raw: Option<&str>) -> Option<NaiveDateTime> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
}

fn parse_shelter_type(raw: Option<&str>) -> Option<ShelterType> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    Some(ShelterType::from_str(raw).unwrap_or(ShelterType::Other))
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

// ── Shelters ───────────────────────────────────────────────────────

impl From<types::ShelterResponse> for Shelter {
    fn from(r: types::ShelterResponse) -> Self {
        Self {
            id: r.id.into(),
            shelter_type: parse_shelter_type(r.shelter_type.as_deref()),
            last_updated: parse_timestamp(r.last_updated.as_deref()),
            name: r.name,
            address: Address {
                line1: r.address_line1,
                line2: non_empty(r.address_line2),
                city: r.city,
                state: r.state,
                zip: r.zip_code,
            },
            latitude: r.latitude,
            longitude: r.longitude,
            total_capacity: r.total_capacity,
            current_availability: r.current_availability,
            allows_pets: r.allows_pets,
            allows_partner: r.allows_partner,
            active: r.active.unwrap_or(true),
            phone: non_empty(r.phone),
            email: non_empty(r.email),
            operating_organization: non_empty(r.operating_organization),
            description: non_empty(r.description),
        }
    }
}

// ── Clients ────────────────────────────────────────────────────────

impl From<types::ClientResponse> for Client {
    fn from(r: types::ClientResponse) -> Self {
        let status = r
            .status
            .as_deref()
            .map_or(ClientStatus::default(), |s| {
                ClientStatus::from_str(s).unwrap_or(ClientStatus::Unknown)
            });
        Self {
            id: r.id.into(),
            name: non_empty(r.name),
            pseudonym: non_empty(r.pseudonym),
            status,
            current_shelter_id: r.current_shelter_id.map(RecordId::from),
            current_shelter_name: non_empty(r.current_shelter_name),
            registration_date: parse_timestamp(r.registration_date.as_deref()),
            last_activity_date: parse_timestamp(r.last_activity_date.as_deref()),
            caseworker_notes: non_empty(r.caseworker_notes),
        }
    }
}

// ── Tasks ──────────────────────────────────────────────────────────

impl From<types::TaskResponse> for Task {
    fn from(r: types::TaskResponse) -> Self {
        let status = r
            .status
            .as_deref()
            .map_or(TaskStatus::Open, |s| {
                TaskStatus::from_str(s).unwrap_or(TaskStatus::Unknown)
            });
        Self {
            id: r.id.into(),
            title: r.title,
            description: non_empty(r.description),
            location: non_empty(r.location),
            status,
            client_id: non_empty(r.client_id),
            scheduled_at: parse_timestamp(r.task_date_time.as_deref()),
            estimated_duration: non_empty(r.estimated_duration),
            compensation_details: non_empty(r.compensation_details),
            contact_name: non_empty(r.task_contact_name),
            contact_phone: non_empty(r.task_contact_phone),
            last_updated: parse_timestamp(r.last_updated.as_deref()),
        }
    }
}

// ── Analytics ──────────────────────────────────────────────────────

impl From<types::ShelterSummaryResponse> for ShelterSummary {
    fn from(r: types::ShelterSummaryResponse) -> Self {
        Self {
            total_shelters: r.total_shelters,
            active_shelters: r.active_shelters,
            inactive_shelters: r.inactive_shelters,
            total_capacity: r.total_capacity,
            current_availability: r.current_availability,
            overall_occupancy_rate: r.overall_occupancy_rate,
            shelters_allowing_pets: r.shelters_allowing_pets,
            shelters_allowing_partners: r.shelters_allowing_partners,
        }
    }
}

impl From<types::ShelterTypeSummaryResponse> for ShelterTypeSummary {
    fn from(r: types::ShelterTypeSummaryResponse) -> Self {
        Self {
            shelter_type: parse_shelter_type(r.shelter_type.as_deref()),
            shelter_count: r.shelter_count,
            total_capacity: r.total_capacity,
            current_availability: r.current_availability,
            occupancy_rate: r.occupancy_rate,
        }
    }
}

impl From<types::TaskSummaryResponse> for TaskSummary {
    fn from(r: types::TaskSummaryResponse) -> Self {
        Self {
            total_tasks: r.total_tasks,
            open_tasks: r.open_tasks,
            assigned_tasks: r.assigned_tasks,
            completed_tasks: r.completed_tasks,
            average_completion_time: r.average_completion_time,
        }
    }
}
