// ── Task domain types ──

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::record_id::RecordId;

/// Lifecycle of a work-opportunity task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[non_exhaustive]
pub enum TaskStatus {
    Open,
    Assigned,
    Completed,
    Unknown,
}

/// A short-term work opportunity offered to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub status: TaskStatus,
    /// Assigned client, kept as the backend's string form.
    pub client_id: Option<String>,
    pub scheduled_at: Option<NaiveDateTime>,
    pub estimated_duration: Option<String>,
    pub compensation_details: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub last_updated: Option<NaiveDateTime>,
}

impl Task {
    pub fn is_assignable(&self) -> bool {
        self.status == TaskStatus::Open
    }

    pub fn is_completable(&self) -> bool {
        self.status == TaskStatus::Assigned
    }
}
