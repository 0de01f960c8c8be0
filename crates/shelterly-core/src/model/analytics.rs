// ── Analytics domain types ──

use serde::{Deserialize, Serialize};

use super::shelter::ShelterType;

/// Fleet-wide shelter counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShelterSummary {
    pub total_shelters: i64,
    pub active_shelters: i64,
    pub inactive_shelters: i64,
    pub total_capacity: i64,
    pub current_availability: i64,
    /// Percentage, 0.0..=100.0.
    pub overall_occupancy_rate: f64,
    pub shelters_allowing_pets: i64,
    pub shelters_allowing_partners: i64,
}

/// Counts for one shelter type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelterTypeSummary {
    pub shelter_type: Option<ShelterType>,
    pub shelter_count: i64,
    pub total_capacity: i64,
    pub current_availability: i64,
    pub occupancy_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub total_tasks: i64,
    pub open_tasks: i64,
    pub assigned_tasks: i64,
    pub completed_tasks: i64,
    /// Hours, when the backend reports it.
    pub average_completion_time: Option<f64>,
}
