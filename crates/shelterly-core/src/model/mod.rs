// ── Domain model ──
//
// Canonical types produced from backend responses. Consumers of the core
// crate never see wire structs.

pub mod analytics;
pub mod client;
pub mod record_id;
pub mod shelter;
pub mod task;

pub use analytics::{ShelterSummary, ShelterTypeSummary, TaskSummary};
pub use client::{Client, ClientStatus};
pub use record_id::RecordId;
pub use shelter::{Address, LOW_AVAILABILITY_PERCENT, Shelter, ShelterType};
pub use task::{Task, TaskStatus};
