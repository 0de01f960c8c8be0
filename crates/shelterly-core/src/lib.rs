// shelterly-core: Shelter directory, reservation workflow, and shared services

pub mod command;
pub mod config;
pub mod console;
pub mod convert;
pub mod directory;
pub mod error;
pub mod model;
pub mod presentation;
pub mod reservation;
pub mod session;
pub mod stream;
pub mod validation;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult};
pub use config::{ConsoleConfig, TlsVerification};
pub use console::{ConnectionState, Console};
pub use directory::{DirectorySnapshot, DirectoryState, LocalFilter, SearchCriteria, ShelterDirectory};
pub use error::CoreError;
pub use presentation::{ReserveControl, ShelterView};
pub use reservation::{ReservationFailure, ReservationInitiator, ReservationStage, ReservationState};
pub use session::{Role, Session, User};
pub use stream::DirectoryStream;

// ── Model re-exports ────────────────────────────────────────────────
pub use model::{
    Client, ClientStatus, RecordId, Shelter, ShelterSummary, ShelterType, ShelterTypeSummary,
    Task, TaskStatus, TaskSummary,
};
