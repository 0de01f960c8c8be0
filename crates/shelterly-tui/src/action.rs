//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::fmt;
use std::sync::Arc;

use shelterly_core::{
    Client, DirectorySnapshot, RecordId, ReservationInitiator, SearchCriteria, Session,
    ShelterType, Task,
};

use crate::screen::ScreenId;

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Pending confirmation action.
#[derive(Debug, Clone)]
pub enum ConfirmAction {
    CompleteTask { id: RecordId, title: String },
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompleteTask { title, .. } => write!(f, "Mark \"{title}\" as completed?"),
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    ToggleHelp,

    // ── Connection ────────────────────────────────────────────────
    Connected,
    Disconnected(String),

    // ── Directory ─────────────────────────────────────────────────
    DirectoryUpdated(DirectorySnapshot),
    RefreshDirectory,
    /// Server-side search with the given flags.
    ServerSearch(SearchCriteria),
    /// Drop server-side criteria and fetch everything again.
    ClearServerSearch,
    SetTypeFilter(Option<ShelterType>),

    // ── Local text search ─────────────────────────────────────────
    OpenSearch,
    CloseSearch,
    SearchInput(String),

    // ── Session ───────────────────────────────────────────────────
    SessionChanged(Option<Arc<Session>>),
    /// Open the login form, optionally with an explanation above it.
    OpenLogin(Option<String>),
    LoggedIn(Session),
    Logout,

    // ── Reservation ───────────────────────────────────────────────
    OpenReserve(RecordId),
    ReservationSubmit { name: String, notes: String },
    ReservationRetry,
    /// A submission or retry returned; carries the initiator back to the
    /// modal. `error` is set only when the request was refused locally.
    ReservationFinished {
        initiator: Box<ReservationInitiator>,
        error: Option<String>,
    },
    CloseModal,

    // ── Clients and tasks ─────────────────────────────────────────
    RefreshClients,
    ClientsLoaded(Result<Arc<Vec<Client>>, String>),
    RefreshTasks,
    TasksLoaded(Result<Arc<Vec<Task>>, String>),
    OpenAssign { id: RecordId, title: String },
    AssignSubmit { id: RecordId, client_id: String },
    /// Carries the client id on success, the error text on failure.
    AssignFinished(Result<String, String>),

    // ── Confirmation ──────────────────────────────────────────────
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
    DismissNotification,
}
