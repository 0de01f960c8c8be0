// ── Console abstraction ──
//
// Service handle shared by the CLI and the TUI. Owns the backend client,
// the explicit session, the shelter directory, and the command processor
// that serializes every write.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use shelterly_api::BackendClient;
use shelterly_api::transport::{TlsMode, TransportConfig};

use crate::command::{Command, CommandEnvelope, CommandResult};
use crate::config::{ConsoleConfig, TlsVerification};
use crate::directory::{DirectorySnapshot, SearchCriteria, ShelterDirectory};
use crate::error::CoreError;
use crate::model::{
    Client, RecordId, Shelter, ShelterSummary, ShelterType, ShelterTypeSummary, Task,
    TaskSummary,
};
use crate::presentation::ShelterView;
use crate::reservation::{ReservationInitiator, ReservationStage};
use crate::session::Session;
use crate::stream::DirectoryStream;

const COMMAND_CHANNEL_SIZE: usize = 64;

// ── ConnectionState ──────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
    Failed,
}

// ── Console ──────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ConsoleInner>`. Reads go straight to the
/// backend; writes are routed through a single command processor task.
/// The backend client is rebuilt whenever the session changes so the
/// `X-User-Role` header always matches it.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    directory: ShelterDirectory,
    session: watch::Sender<Option<Arc<Session>>>,
    connection_state: watch::Sender<ConnectionState>,
    client: ArcSwapOption<BackendClient>,
    command_tx: mpsc::Sender<CommandEnvelope>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Console {
    /// Create a console. Does NOT connect -- call
    /// [`connect()`](Self::connect) to build the client and start the
    /// command processor.
    pub fn new(config: ConsoleConfig, session: Option<Session>) -> Self {
        let (session, _) = watch::channel(session.map(Arc::new));
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);

        Self {
            inner: Arc::new(ConsoleInner {
                config,
                directory: ShelterDirectory::new(),
                session,
                connection_state,
                client: ArcSwapOption::empty(),
                command_tx,
                command_rx: Mutex::new(Some(command_rx)),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn directory(&self) -> &ShelterDirectory {
        &self.inner.directory
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Build the backend client and spawn the command processor.
    ///
    /// No request is sent; the backend is first contacted by the
    /// caller's initial fetch.
    pub async fn connect(&self) -> Result<(), CoreError> {
        if let Err(e) = self.rebuild_client() {
            let _ = self.inner.connection_state.send(ConnectionState::Failed);
            return Err(e);
        }

        let mut handles = self.inner.task_handles.lock().await;
        if let Some(rx) = self.inner.command_rx.lock().await.take() {
            let console = self.clone();
            handles.push(tokio::spawn(command_processor_task(console, rx)));
        }

        let _ = self.inner.connection_state.send(ConnectionState::Connected);
        info!(url = %self.inner.config.api_url, "console connected");
        Ok(())
    }

    /// Stop background tasks and drop the backend client.
    pub async fn disconnect(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        self.inner.client.store(None);
        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Disconnected);
        debug!("disconnected");
    }

    /// One-shot: connect, run closure, disconnect.
    pub async fn oneshot<F, Fut, T>(
        config: ConsoleConfig,
        session: Option<Session>,
        f: F,
    ) -> Result<T, CoreError>
    where
        F: FnOnce(Console) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let console = Console::new(config, session);
        console.connect().await?;
        let result = f(console.clone()).await;
        console.disconnect().await;
        result
    }

    // ── Session ──────────────────────────────────────────────────

    pub fn session(&self) -> Option<Arc<Session>> {
        self.inner.session.borrow().clone()
    }

    /// Subscribe to login/logout (including a backend-forced logout).
    pub fn session_changes(&self) -> watch::Receiver<Option<Arc<Session>>> {
        self.inner.session.subscribe()
    }

    /// Replace the session and rebuild the client so the role header
    /// follows it.
    pub fn set_session(&self, session: Option<Session>) -> Result<(), CoreError> {
        self.inner.session.send_replace(session.map(Arc::new));
        if *self.inner.connection_state.borrow() == ConnectionState::Connected {
            self.rebuild_client()?;
        }
        Ok(())
    }

    fn require_session(&self, action: &str) -> Result<Arc<Session>, CoreError> {
        self.session().ok_or_else(|| CoreError::LoginRequired {
            action: action.to_owned(),
        })
    }

    fn require_admin(&self, action: &str) -> Result<(), CoreError> {
        self.require_session(action)?.require_admin()
    }

    // ── Backend access ───────────────────────────────────────────

    fn rebuild_client(&self) -> Result<(), CoreError> {
        let transport = build_transport(&self.inner.config);
        let role = self.session().map(|s| s.role().as_header());
        let client = BackendClient::new(self.inner.config.api_url.as_str(), role, &transport)?;
        self.inner.client.store(Some(Arc::new(client)));
        debug!(role = role.unwrap_or("none"), "backend client built");
        Ok(())
    }

    fn client(&self) -> Result<Arc<BackendClient>, CoreError> {
        self.inner.client.load_full().ok_or(CoreError::Disconnected)
    }

    /// Translate a backend error, clearing the session on 401.
    fn track<T>(&self, result: Result<T, shelterly_api::Error>) -> Result<T, CoreError> {
        result.map_err(|e| {
            let err = CoreError::from(e);
            if err.is_session_expired() && self.session().is_some() {
                warn!("backend rejected the session; logging out");
                if let Err(rebuild) = self.set_session(None) {
                    warn!(error = %rebuild, "failed to rebuild client after logout");
                }
            }
            err
        })
    }

    // ── Command execution ────────────────────────────────────────

    /// Execute a write command.
    ///
    /// Every command needs a session; admin commands need the admin role.
    /// The command is sent through the internal channel to the command
    /// processor task and the result awaited.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        if *self.inner.connection_state.borrow() != ConnectionState::Connected {
            return Err(CoreError::Disconnected);
        }
        if cmd.requires_admin() {
            self.require_admin(cmd.action())?;
        } else {
            self.require_session(cmd.action())?;
        }

        let (tx, rx) = tokio::sync::oneshot::channel();

        self.inner
            .command_tx
            .send(CommandEnvelope {
                command: cmd,
                response_tx: tx,
            })
            .await
            .map_err(|_| CoreError::Disconnected)?;

        rx.await.map_err(|_| CoreError::Disconnected)?
    }

    // ── Shelter directory ────────────────────────────────────────

    /// Load the full shelter collection into the directory.
    ///
    /// A response superseded by a newer request is dropped; the error, if
    /// any, is still returned to the caller.
    pub async fn fetch_all(&self) -> Result<(), CoreError> {
        let client = self.client()?;
        let token = self.inner.directory.begin_request();
        let result = self
            .track(client.list_shelters().await)
            .map(|list| list.into_iter().map(Shelter::from).collect::<Vec<_>>());

        match result {
            Ok(shelters) => {
                self.inner.directory.complete(token, None, Ok(shelters));
                Ok(())
            }
            Err(e) => {
                self.inner.directory.complete(token, None, Err(&e));
                Err(e)
            }
        }
    }

    /// Server-side search. False criteria are omitted from the request.
    pub async fn search(&self, criteria: SearchCriteria) -> Result<(), CoreError> {
        let client = self.client()?;
        let token = self.inner.directory.begin_request();
        let result = self
            .track(client.search_shelters(&criteria.to_query()).await)
            .map(|list| list.into_iter().map(Shelter::from).collect::<Vec<_>>());

        match result {
            Ok(shelters) => {
                self.inner
                    .directory
                    .complete(token, Some(criteria), Ok(shelters));
                Ok(())
            }
            Err(e) => {
                self.inner.directory.complete(token, Some(criteria), Err(&e));
                Err(e)
            }
        }
    }

    /// Repeat the last directory request (full fetch or search).
    pub async fn refresh(&self) -> Result<(), CoreError> {
        match self.inner.directory.snapshot().criteria {
            Some(criteria) => self.search(criteria).await,
            None => self.fetch_all().await,
        }
    }

    pub fn apply_local_filter(&self, text: &str) {
        self.inner.directory.apply_local_filter(text);
    }

    pub fn set_type_filter(&self, shelter_type: Option<ShelterType>) {
        self.inner.directory.set_type_filter(shelter_type);
    }

    pub fn directory_snapshot(&self) -> DirectorySnapshot {
        self.inner.directory.snapshot()
    }

    pub fn shelters(&self) -> DirectoryStream {
        self.inner.directory.subscribe()
    }

    /// Visible shelters with their presentation state for the current session.
    pub fn shelter_views(&self) -> Vec<ShelterView> {
        let snapshot = self.inner.directory.snapshot();
        let session = self.session();
        ShelterView::from_list(&snapshot.visible, session.as_deref())
    }

    pub async fn get_shelter(&self, id: &RecordId) -> Result<Shelter, CoreError> {
        let client = self.client()?;
        self.track(client.get_shelter(&id.to_wire()).await)
            .map(Shelter::from)
    }

    // ── Reservation ──────────────────────────────────────────────

    /// Register a client, then reserve a bed for them at the initiator's
    /// shelter, then refresh the directory.
    ///
    /// `Err` is returned only when the submission was refused before any
    /// request (not logged in, blank name, already submitting). Backend
    /// failures land in the initiator's `Failed` state instead.
    pub async fn submit_reservation(
        &self,
        initiator: &mut ReservationInitiator,
        name: &str,
        notes: &str,
    ) -> Result<(), CoreError> {
        self.require_session("reserve beds")?;
        let name = initiator.begin_submit(name)?;

        let created = self
            .execute(Command::CreateClient {
                name: name.clone(),
                caseworker_notes: notes.to_owned(),
            })
            .await
            .and_then(|result| match result {
                CommandResult::Client(client) => Ok(client),
                other => Err(CoreError::Internal(format!(
                    "unexpected result for client creation: {other:?}"
                ))),
            });

        let mut client = match created {
            Ok(client) => client,
            Err(e) => {
                initiator.fail(ReservationStage::ClientCreation, &e);
                return Ok(());
            }
        };
        client.name.get_or_insert(name);

        self.reserve_for(initiator, client).await;
        Ok(())
    }

    /// Re-issue only the bed reservation for a client created by a failed
    /// submission. Never registers a second client.
    pub async fn retry_reservation(
        &self,
        initiator: &mut ReservationInitiator,
    ) -> Result<(), CoreError> {
        self.require_session("reserve beds")?;
        let client = initiator.begin_retry()?;
        self.reserve_for(initiator, client).await;
        Ok(())
    }

    async fn reserve_for(&self, initiator: &mut ReservationInitiator, client: Client) {
        let shelter_id = initiator.shelter().id.clone();
        let reserved = self
            .execute(Command::ReserveBed {
                shelter_id: shelter_id.clone(),
                client_id: client.id.clone(),
            })
            .await;

        match reserved {
            Ok(_) => {
                info!(shelter = %shelter_id, client = %client.id, "bed reserved");
                initiator.succeed(client);
                // The re-fetch is the only trusted view of the new availability.
                if let Err(e) = self.refresh().await {
                    warn!(error = %e, "directory refresh after reservation failed");
                }
            }
            Err(e) => initiator.fail(ReservationStage::BedReservation { client }, &e),
        }
    }

    // ── Clients ──────────────────────────────────────────────────

    pub async fn list_clients(&self) -> Result<Vec<Client>, CoreError> {
        let client = self.client()?;
        let clients = self.track(client.list_clients().await)?;
        Ok(clients.into_iter().map(Client::from).collect())
    }

    pub async fn get_client(&self, id: &RecordId) -> Result<Client, CoreError> {
        let client = self.client()?;
        self.track(client.get_client(&id.to_wire()).await)
            .map(Client::from)
    }

    /// Register a client without reserving a bed.
    pub async fn register_client(&self, name: &str, notes: &str) -> Result<Client, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "Client name is required".into(),
            });
        }
        match self
            .execute(Command::CreateClient {
                name: name.to_owned(),
                caseworker_notes: notes.to_owned(),
            })
            .await?
        {
            CommandResult::Client(mut client) => {
                client.name.get_or_insert_with(|| name.to_owned());
                Ok(client)
            }
            other => Err(CoreError::Internal(format!(
                "unexpected result for client creation: {other:?}"
            ))),
        }
    }

    // ── Tasks ────────────────────────────────────────────────────

    pub async fn list_tasks(&self) -> Result<Vec<Task>, CoreError> {
        let client = self.client()?;
        let tasks = self.track(client.list_tasks().await)?;
        Ok(tasks.into_iter().map(Task::from).collect())
    }

    pub async fn get_task(&self, id: &RecordId) -> Result<Task, CoreError> {
        let client = self.client()?;
        self.track(client.get_task(&id.to_wire()).await)
            .map(Task::from)
    }

    pub async fn assign_task(&self, id: &RecordId, client_id: &str) -> Result<(), CoreError> {
        let client_id = client_id.trim();
        if client_id.is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "Client id is required".into(),
            });
        }
        self.execute(Command::AssignTask {
            id: id.clone(),
            client_id: client_id.to_owned(),
        })
        .await
        .map(|_| ())
    }

    pub async fn complete_task(&self, id: &RecordId) -> Result<(), CoreError> {
        self.execute(Command::CompleteTask { id: id.clone() })
            .await
            .map(|_| ())
    }

    // ── Analytics (admin) ────────────────────────────────────────

    pub async fn shelter_summary(&self) -> Result<ShelterSummary, CoreError> {
        self.require_admin("view analytics")?;
        let client = self.client()?;
        self.track(client.shelter_summary().await)
            .map(ShelterSummary::from)
    }

    pub async fn shelter_type_summary(&self) -> Result<Vec<ShelterTypeSummary>, CoreError> {
        self.require_admin("view analytics")?;
        let client = self.client()?;
        let rows = self.track(client.shelter_type_summary().await)?;
        Ok(rows.into_iter().map(ShelterTypeSummary::from).collect())
    }

    pub async fn task_summary(&self) -> Result<TaskSummary, CoreError> {
        self.require_admin("view analytics")?;
        let client = self.client()?;
        self.track(client.task_summary().await)
            .map(TaskSummary::from)
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to connection state changes.
    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Process commands from the mpsc channel, one at a time.
async fn command_processor_task(console: Console, mut rx: mpsc::Receiver<CommandEnvelope>) {
    let cancel = console.inner.cancel.clone();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let result = route_command(&console, envelope.command).await;
                let _ = envelope.response_tx.send(result);
            }
        }
    }
}

// ── Command routing ──────────────────────────────────────────────

/// Route a command to its backend call.
async fn route_command(console: &Console, cmd: Command) -> Result<CommandResult, CoreError> {
    let client = console.client()?;

    match cmd {
        // ── Client operations ────────────────────────────────────
        Command::CreateClient {
            name,
            caseworker_notes,
        } => {
            let req = shelterly_api::types::CreateClientRequest {
                name,
                caseworker_notes,
            };
            let created = console.track(client.create_client(&req).await)?;
            Ok(CommandResult::Client(Client::from(created)))
        }

        // ── Reservation operations ───────────────────────────────
        Command::ReserveBed {
            shelter_id,
            client_id,
        } => {
            console.track(
                client
                    .reserve_bed(&shelter_id.to_wire(), &client_id.to_wire())
                    .await,
            )?;
            Ok(CommandResult::Ok)
        }

        // ── Task operations ──────────────────────────────────────
        Command::AssignTask { id, client_id } => {
            console.track(client.assign_task(&id.to_wire(), &client_id).await)?;
            Ok(CommandResult::Ok)
        }

        Command::CompleteTask { id } => {
            console.track(client.complete_task(&id.to_wire()).await)?;
            Ok(CommandResult::Ok)
        }

        // ── Admin: tasks ─────────────────────────────────────────
        Command::CreateTask(draft) => {
            let task = console.track(client.create_task(&draft.to_wire()).await)?;
            Ok(CommandResult::Task(Task::from(task)))
        }

        Command::UpdateTask { id, draft } => {
            let task = console.track(client.update_task(&id.to_wire(), &draft.to_wire()).await)?;
            Ok(CommandResult::Task(Task::from(task)))
        }

        Command::DeleteTask { id } => {
            console.track(client.delete_task(&id.to_wire()).await)?;
            Ok(CommandResult::Ok)
        }

        // ── Admin: shelters ──────────────────────────────────────
        Command::CreateShelter(draft) => {
            let shelter = console.track(client.create_shelter(&draft.to_wire()).await)?;
            Ok(CommandResult::Shelter(Shelter::from(shelter)))
        }

        Command::UpdateShelter { id, draft } => {
            let shelter =
                console.track(client.update_shelter(&id.to_wire(), &draft.to_wire()).await)?;
            Ok(CommandResult::Shelter(Shelter::from(shelter)))
        }

        Command::DeleteShelter { id } => {
            console.track(client.delete_shelter(&id.to_wire()).await)?;
            Ok(CommandResult::Ok)
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────

/// Build a [`TransportConfig`] from the console configuration.
fn build_transport(config: &ConsoleConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
