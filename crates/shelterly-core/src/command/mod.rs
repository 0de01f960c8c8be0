// ── Command API ──
//
// All write operations flow through a unified `Command` enum, routed by the
// console's command processor to the matching backend call.

pub mod requests;

use crate::error::CoreError;
use crate::model::{Client, RecordId, Shelter, Task};

pub use requests::{ShelterDraft, TaskDraft};

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, CoreError>>,
}

/// All write operations against the backend.
#[derive(Debug, Clone)]
pub enum Command {
    // ── Client operations ────────────────────────────────────────────
    CreateClient {
        name: String,
        caseworker_notes: String,
    },

    // ── Reservation operations ───────────────────────────────────────
    ReserveBed {
        shelter_id: RecordId,
        client_id: RecordId,
    },

    // ── Task operations ──────────────────────────────────────────────
    AssignTask {
        id: RecordId,
        client_id: String,
    },
    CompleteTask {
        id: RecordId,
    },

    // ── Admin: tasks ─────────────────────────────────────────────────
    CreateTask(TaskDraft),
    UpdateTask {
        id: RecordId,
        draft: TaskDraft,
    },
    DeleteTask {
        id: RecordId,
    },

    // ── Admin: shelters ──────────────────────────────────────────────
    CreateShelter(ShelterDraft),
    UpdateShelter {
        id: RecordId,
        draft: ShelterDraft,
    },
    DeleteShelter {
        id: RecordId,
    },
}

impl Command {
    /// Whether the local session must carry the admin role.
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Self::CreateTask(_)
                | Self::UpdateTask { .. }
                | Self::DeleteTask { .. }
                | Self::CreateShelter(_)
                | Self::UpdateShelter { .. }
                | Self::DeleteShelter { .. }
        )
    }

    /// Short verb phrase used in login prompts.
    pub fn action(&self) -> &'static str {
        match self {
            Self::CreateClient { .. } => "register clients",
            Self::ReserveBed { .. } => "reserve beds",
            Self::AssignTask { .. } => "assign tasks",
            Self::CompleteTask { .. } => "complete tasks",
            Self::CreateTask(_) | Self::UpdateTask { .. } | Self::DeleteTask { .. } => {
                "manage tasks"
            }
            Self::CreateShelter(_) | Self::UpdateShelter { .. } | Self::DeleteShelter { .. } => {
                "manage shelters"
            }
        }
    }
}

/// Result of a command execution.
#[derive(Debug)]
pub enum CommandResult {
    Ok,
    Client(Client),
    Task(Task),
    Shelter(Shelter),
}
