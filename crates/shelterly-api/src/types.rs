//! Request and response types for the Shelterly REST backend.
//!
//! All types match the JSON bodies of the `/api/` endpoints. Field names
//! use camelCase via `#[serde(rename_all = "camelCase")]`. Enumerations and
//! timestamps stay as strings here; `shelterly-core` converts them into
//! domain types.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Identifiers ──────────────────────────────────────────────────────

/// A record identifier as it appears on the wire.
///
/// The backend issues numeric ids; string ids are accepted so the console
/// stays usable against backends that issue opaque keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Number(i64),
    Text(String),
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for WireId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for WireId {
    fn from(s: &str) -> Self {
        s.parse::<i64>()
            .map_or_else(|_| Self::Text(s.to_owned()), Self::Number)
    }
}

// ── Shelters ─────────────────────────────────────────────────────────

/// Shelter record, from `GET /api/shelters`, `/api/shelters/search`,
/// and `/api/shelters/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelterResponse {
    pub id: WireId,
    pub name: String,
    #[serde(default)]
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    /// Signed on purpose: negative values are a backend contract breach the
    /// console must tolerate rather than fail to decode.
    #[serde(default)]
    pub total_capacity: i64,
    #[serde(default)]
    pub current_availability: i64,
    /// One of: `CONGREGATE`, `TINY_HOME`, `SAFE_PARKING`,
    /// `MOTEL_CONVERSION`, `NAVIGATION_CENTER`, `OTHER`.
    #[serde(default)]
    pub shelter_type: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub operating_organization: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub allows_pets: bool,
    #[serde(default)]
    pub allows_partner: bool,
    #[serde(default, alias = "isActive")]
    pub active: Option<bool>,
    /// ISO 8601 local date-time.
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// Query for `GET /api/shelters/search`.
///
/// Only keys that are set end up in the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShelterSearchQuery {
    pub shelter_type: Option<String>,
    pub allows_pets: Option<bool>,
    pub allows_partner: Option<bool>,
    pub is_active: Option<bool>,
}

impl ShelterSearchQuery {
    /// Encode the present keys as query parameters.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(ref t) = self.shelter_type {
            params.push(("shelterType", t.clone()));
        }
        if let Some(v) = self.allows_pets {
            params.push(("allowsPets", v.to_string()));
        }
        if let Some(v) = self.allows_partner {
            params.push(("allowsPartner", v.to_string()));
        }
        if let Some(v) = self.is_active {
            params.push(("isActive", v.to_string()));
        }
        params
    }
}

/// Body for `POST /api/shelters/{id}/reserve`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveBedRequest {
    pub client_id: WireId,
}

/// Body for `POST /api/admin/shelters` and `PUT /api/admin/shelters/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelterRequest {
    pub name: String,
    pub address_line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub total_capacity: i64,
    pub current_availability: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shelter_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub allows_pets: bool,
    pub allows_partner: bool,
    pub is_active: bool,
}

// ── Clients ──────────────────────────────────────────────────────────

/// Client (service recipient) record, from `GET /api/clients[/{id}]`
/// and `POST /api/clients`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientResponse {
    pub id: WireId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub pseudonym: Option<String>,
    /// One of: `SEEKING_PLACEMENT`, `SHELTERED`, `INACTIVE`, `PERMANENTLY_HOUSED`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub current_shelter_id: Option<WireId>,
    #[serde(default)]
    pub current_shelter_name: Option<String>,
    #[serde(default)]
    pub registration_date: Option<String>,
    #[serde(default)]
    pub last_activity_date: Option<String>,
    #[serde(default)]
    pub caseworker_notes: Option<String>,
}

/// Body for `POST /api/clients`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    pub name: String,
    pub caseworker_notes: String,
}

// ── Tasks ────────────────────────────────────────────────────────────

/// Work-opportunity task, from `GET /api/tasks[/{id}]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: WireId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// One of: `OPEN`, `ASSIGNED`, `COMPLETED`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub task_date_time: Option<String>,
    #[serde(default)]
    pub estimated_duration: Option<String>,
    #[serde(default)]
    pub compensation_details: Option<String>,
    #[serde(default)]
    pub task_contact_name: Option<String>,
    #[serde(default)]
    pub task_contact_phone: Option<String>,
}

/// Body for `POST /api/admin/tasks` and `PUT /api/admin/tasks/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compensation_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_contact_phone: Option<String>,
}

/// Body for `PUT /api/tasks/{id}/assign`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTaskRequest {
    pub client_id: String,
}

// ── Analytics ────────────────────────────────────────────────────────

/// From `GET /api/admin/analytics/shelter-summary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShelterSummaryResponse {
    pub total_shelters: i64,
    pub active_shelters: i64,
    pub inactive_shelters: i64,
    pub total_capacity: i64,
    pub current_availability: i64,
    pub overall_occupancy_rate: f64,
    pub shelters_allowing_pets: i64,
    pub shelters_allowing_partners: i64,
}

/// One row of `GET /api/admin/analytics/shelter-types`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShelterTypeSummaryResponse {
    pub shelter_type: Option<String>,
    pub shelter_count: i64,
    pub total_capacity: i64,
    pub current_availability: i64,
    pub occupancy_rate: f64,
}

/// From `GET /api/admin/analytics/task-summary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskSummaryResponse {
    pub total_tasks: i64,
    pub open_tasks: i64,
    pub assigned_tasks: i64,
    pub completed_tasks: i64,
    pub average_completion_time: Option<f64>,
}

// ── Errors ───────────────────────────────────────────────────────────

/// Error body shape returned by the backend on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wire_id_accepts_numbers_and_strings() {
        let n: WireId = serde_json::from_str("42").unwrap();
        let s: WireId = serde_json::from_str("\"shelter-7\"").unwrap();
        assert_eq!(n, WireId::Number(42));
        assert_eq!(s, WireId::Text("shelter-7".into()));
        assert_eq!(n.to_string(), "42");
        assert_eq!(WireId::from("17"), WireId::Number(17));
        assert_eq!(WireId::from("abc"), WireId::Text("abc".into()));
    }

    #[test]
    fn reserve_body_keeps_numeric_client_id() {
        let body = ReserveBedRequest {
            client_id: WireId::Number(5),
        };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"clientId":5}"#);
    }

    #[test]
    fn shelter_accepts_is_active_alias_and_missing_optionals() {
        let json = serde_json::json!({
            "id": 1,
            "name": "Casa A",
            "addressLine1": "123 San Fernando Rd",
            "city": "San Jose",
            "state": "CA",
            "zipCode": "95112",
            "totalCapacity": 10,
            "currentAvailability": 1,
            "isActive": true
        });
        let shelter: ShelterResponse = serde_json::from_value(json).unwrap();
        assert_eq!(shelter.active, Some(true));
        assert_eq!(shelter.shelter_type, None);
        assert!(!shelter.allows_pets);
    }

    #[test]
    fn search_query_only_encodes_present_keys() {
        let query = ShelterSearchQuery {
            shelter_type: Some("TINY_HOME".into()),
            allows_pets: Some(true),
            ..ShelterSearchQuery::default()
        };
        assert_eq!(
            query.to_params(),
            vec![
                ("shelterType", "TINY_HOME".to_string()),
                ("allowsPets", "true".to_string()),
            ]
        );
        assert!(ShelterSearchQuery::default().to_params().is_empty());
    }
}
