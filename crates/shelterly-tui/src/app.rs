//! Application core: the event loop, screen switching, and action dispatch.
//!
//! Every console call runs on a spawned task and reports back through the
//! action channel, so the render loop never waits on the network.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use shelterly_core::{Console, RecordId, ReserveControl, SearchCriteria, Session};

use crate::action::{Action, ConfirmAction, Notification, NotificationLevel};
use crate::component::Component;
use crate::data_bridge::spawn_data_bridge;
use crate::event::{Event, EventReader};
use crate::modals::{AssignModal, LoginDefaults, LoginModal, Modal, ReservationModal};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::input::{hint_line, render_panel};

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);
const RESERVE_LOGIN_NOTICE: &str = "Log in to reserve a bed";
const ASSIGN_LOGIN_NOTICE: &str = "Log in to assign tasks";
const SESSION_EXPIRED_NOTICE: &str = "Session expired. Please log in again.";

/// Connection status as seen by the TUI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Disconnected(String),
}

/// Top-level application state and event loop.
pub struct App {
    console: Console,
    login_defaults: LoginDefaults,
    /// Current active screen.
    active_screen: ScreenId,
    /// All screen components, keyed by ScreenId.
    screens: HashMap<ScreenId, Box<dyn Component>>,
    /// Whether the app should keep running.
    running: bool,
    connection_status: ConnectionStatus,
    /// Last session seen; used to tell a forced logout from a chosen one.
    session: Option<Arc<Session>>,
    help_visible: bool,
    search_active: bool,
    search_query: String,
    /// Open form overlay; captures all input.
    modal: Option<Modal>,
    pending_confirm: Option<ConfirmAction>,
    notification: Option<(Notification, Instant)>,
    /// Components and background tasks dispatch through this sender.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Drained by the main loop.
    action_rx: mpsc::UnboundedReceiver<Action>,
    data_cancel: CancellationToken,
}

impl App {
    pub fn new(console: Console, login_defaults: LoginDefaults) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();

        Self {
            session: console.session(),
            console,
            login_defaults,
            active_screen: ScreenId::Shelters,
            screens,
            running: true,
            connection_status: ConnectionStatus::default(),
            help_visible: false,
            search_active: false,
            search_query: String::new(),
            modal: None,
            pending_confirm: None,
            notification: None,
            action_tx,
            action_rx,
            data_cancel: CancellationToken::new(),
        }
    }

    /// Initialize all screen components with the action sender.
    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        // Screens render the right reserve controls before the bridge reports.
        self.action_tx
            .send(Action::SessionChanged(self.console.session()))?;

        tokio::spawn(spawn_data_bridge(
            self.console.clone(),
            self.action_tx.clone(),
            self.data_cancel.clone(),
        ));

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Paste(text) => self.handle_paste(&text),
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    // ── Input ─────────────────────────────────────────────────────

    /// Map a key event to an action. Overlays take keys first, then global
    /// bindings, then the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if let Some(ref mut modal) = self.modal {
            return Ok(modal.handle_key_event(key));
        }

        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if self.search_active {
            return Ok(self.handle_search_key(key));
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        let capturing = self
            .screens
            .get(&self.active_screen)
            .is_some_and(|s| s.captures_input());

        if !capturing {
            match (key.modifiers, key.code) {
                (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
                (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
                (KeyModifiers::NONE, KeyCode::Char('/')) => return Ok(Some(Action::OpenSearch)),
                (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='3')) => {
                    let n = c.to_digit(10).and_then(|d| u8::try_from(d).ok());
                    if let Some(screen) = n.and_then(ScreenId::from_number) {
                        return Ok(Some(Action::SwitchScreen(screen)));
                    }
                }
                (KeyModifiers::NONE, KeyCode::Tab) => {
                    return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
                }
                (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                    return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
                }
                _ => {}
            }
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    /// Keys while the `/` search line is open. Every edit re-filters.
    fn handle_search_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.search_query.clear();
                let _ = self.action_tx.send(Action::SearchInput(String::new()));
                Some(Action::CloseSearch)
            }
            KeyCode::Enter => Some(Action::CloseSearch),
            KeyCode::Backspace => {
                self.search_query.pop();
                Some(Action::SearchInput(self.search_query.clone()))
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search_query.push(c);
                Some(Action::SearchInput(self.search_query.clone()))
            }
            _ => None,
        }
    }

    fn handle_paste(&mut self, text: &str) {
        if let Some(ref mut modal) = self.modal {
            modal.paste(text);
        } else if self.search_active {
            self.search_query
                .extend(text.chars().filter(|c| *c != '\n' && *c != '\r'));
            let _ = self
                .action_tx
                .send(Action::SearchInput(self.search_query.clone()));
        }
    }

    // ── Dispatch ──────────────────────────────────────────────────

    /// Update app state for one action and propagate it to components.
    #[allow(clippy::too_many_lines)]
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Tick => {
                if let Some(ref mut modal) = self.modal {
                    modal.tick();
                }
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, at)| at.elapsed() >= NOTIFICATION_TTL)
                {
                    self.notification = None;
                }
            }

            // Drawing happens in the main loop; ratatui re-lays out on resize.
            Action::Render | Action::Resize(..) => {}

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.active_screen = *target;
                    self.search_query.clear();
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }
                }
                self.forward_to_active(action)?;
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::OpenSearch => self.search_active = true,
            Action::CloseSearch => self.search_active = false,

            Action::SearchInput(query) => {
                if self.active_screen == ScreenId::Shelters {
                    self.console.apply_local_filter(query);
                } else {
                    self.forward_to_active(action)?;
                }
            }

            Action::Connected => self.connection_status = ConnectionStatus::Connected,
            Action::Disconnected(reason) => {
                self.connection_status = ConnectionStatus::Disconnected(reason.clone());
            }

            // ── Directory ──
            Action::DirectoryUpdated(_) => self.broadcast(action)?,
            Action::SetTypeFilter(shelter_type) => self.console.set_type_filter(*shelter_type),
            Action::RefreshDirectory => self.spawn_directory_load(None),
            Action::ServerSearch(criteria) => self.spawn_directory_load(Some(*criteria)),
            Action::ClearServerSearch => self.spawn_directory_load(Some(SearchCriteria::default())),

            // ── Session ──
            Action::SessionChanged(session) => {
                if session.is_none() && self.session.is_some() {
                    warn!("session dropped by the backend");
                    if let Err(e) = shelterly_config::clear_session() {
                        warn!(error = %e, "failed to clear session file");
                    }
                    self.modal = None;
                    self.notify(Notification::warning(SESSION_EXPIRED_NOTICE));
                }
                self.session.clone_from(session);
                self.broadcast(action)?;
            }
            Action::OpenLogin(notice) => self.open_login(notice.clone()),
            Action::LoggedIn(session) => self.log_in(session.clone()),
            Action::Logout => self.log_out(),

            // ── Reservation ──
            Action::OpenReserve(id) => self.open_reserve(id),
            Action::ReservationSubmit { name, notes } => {
                self.spawn_reservation(Some((name.clone(), notes.clone())));
            }
            Action::ReservationRetry => self.spawn_reservation(None),
            Action::ReservationFinished { initiator, error } => {
                if let Some(Modal::Reservation(ref mut modal)) = self.modal {
                    modal.finish((**initiator).clone(), error.clone());
                }
            }
            Action::CloseModal => self.modal = None,

            // ── Clients and tasks ──
            Action::RefreshClients => {
                self.forward_to_active(action)?;
                let console = self.console.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let result = console
                        .list_clients()
                        .await
                        .map(Arc::new)
                        .map_err(|e| e.to_string());
                    let _ = tx.send(Action::ClientsLoaded(result));
                });
            }
            Action::RefreshTasks => {
                self.forward_to_active(action)?;
                let console = self.console.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let result = console
                        .list_tasks()
                        .await
                        .map(Arc::new)
                        .map_err(|e| e.to_string());
                    let _ = tx.send(Action::TasksLoaded(result));
                });
            }
            Action::ClientsLoaded(_) | Action::TasksLoaded(_) => self.broadcast(action)?,
            Action::OpenAssign { id, title } => {
                if self.session.is_some() {
                    self.modal = Some(Modal::Assign(AssignModal::new(id.clone(), title.clone())));
                } else {
                    self.open_login(Some(ASSIGN_LOGIN_NOTICE.into()));
                }
            }
            Action::AssignSubmit { id, client_id } => {
                self.spawn_assign(id.clone(), client_id.clone());
            }
            Action::AssignFinished(result) => self.finish_assign(result.clone()),

            // ── Confirmation ──
            Action::ShowConfirm(confirm) => self.pending_confirm = Some(confirm.clone()),
            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    self.run_confirmed(confirm);
                }
            }
            Action::ConfirmNo => self.pending_confirm = None,

            // ── Notifications ──
            Action::Notify(notification) => self.notify(notification.clone()),
            Action::DismissNotification => self.notification = None,
        }

        Ok(())
    }

    fn forward_to_active(&mut self, action: &Action) -> Result<()> {
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    /// Data updates reach every screen, focused or not.
    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    fn notify(&mut self, notification: Notification) {
        self.notification = Some((notification, Instant::now()));
    }

    fn open_login(&mut self, notice: Option<String>) {
        self.modal = Some(Modal::Login(LoginModal::new(&self.login_defaults, notice)));
    }

    fn log_in(&mut self, session: Session) {
        if let Err(e) = shelterly_config::save_session(&session) {
            warn!(error = %e, "failed to persist session");
        }
        let name = session.user.name.clone();
        // Record it first so the echo from the watch channel is not a change.
        self.session = Some(Arc::new(session.clone()));
        if let Err(e) = self.console.set_session(Some(session)) {
            self.notify(Notification::error(e.to_string()));
            return;
        }
        self.modal = None;
        self.notify(Notification::success(format!("Logged in as {name}")));
    }

    fn log_out(&mut self) {
        if self.session.is_none() {
            self.notify(Notification::info("Not logged in"));
            return;
        }
        self.session = None;
        if let Err(e) = self.console.set_session(None) {
            warn!(error = %e, "failed to drop session");
        }
        if let Err(e) = shelterly_config::clear_session() {
            warn!(error = %e, "failed to clear session file");
        }
        self.notify(Notification::info("Logged out"));
    }

    fn open_reserve(&mut self, id: &RecordId) {
        let Some(shelter) = self.console.directory().find(id) else {
            self.notify(Notification::warning("Shelter is no longer listed"));
            return;
        };
        match ReserveControl::for_shelter(&shelter, self.session.as_deref()) {
            ReserveControl::Enabled => {
                self.modal = Some(Modal::Reservation(ReservationModal::new(shelter)));
            }
            ReserveControl::RequiresLogin => self.open_login(Some(RESERVE_LOGIN_NOTICE.into())),
            ReserveControl::Disabled => {
                self.notify(Notification::warning(format!(
                    "No beds available at {}",
                    shelter.name
                )));
            }
        }
    }

    /// Lend the modal's initiator to a background submission. `Some` input
    /// is a fresh submit; `None` retries the bed step.
    fn spawn_reservation(&mut self, input: Option<(String, String)>) {
        let Some(Modal::Reservation(ref mut modal)) = self.modal else {
            return;
        };
        let Some(mut initiator) = modal.take_initiator() else {
            return;
        };
        let console = self.console.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = match input {
                Some((name, notes)) => {
                    console
                        .submit_reservation(&mut initiator, &name, &notes)
                        .await
                }
                None => console.retry_reservation(&mut initiator).await,
            };
            let error = result.err().map(|e| e.to_string());
            let _ = tx.send(Action::ReservationFinished {
                initiator: Box::new(initiator),
                error,
            });
        });
    }

    fn spawn_assign(&self, id: RecordId, client_id: String) {
        let console = self.console.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = console
                .assign_task(&id, &client_id)
                .await
                .map(|()| client_id)
                .map_err(|e| e.to_string());
            let _ = tx.send(Action::AssignFinished(result));
        });
    }

    fn finish_assign(&mut self, result: Result<String, String>) {
        // A forced logout may already have closed the form.
        let Some(Modal::Assign(ref mut modal)) = self.modal else {
            return;
        };
        match result {
            Ok(client_id) => {
                let message = format!("Assigned \"{}\" to client {client_id}", modal.title());
                self.modal = None;
                self.notify(Notification::success(message));
                let _ = self.action_tx.send(Action::RefreshTasks);
            }
            Err(message) => modal.fail(message),
        }
    }

    /// `None` re-runs the current query; empty criteria fetch everything.
    fn spawn_directory_load(&self, criteria: Option<SearchCriteria>) {
        let console = self.console.clone();
        tokio::spawn(async move {
            let result = match criteria {
                None => console.refresh().await,
                Some(c) if c.is_empty() => console.fetch_all().await,
                Some(c) => console.search(c).await,
            };
            // The snapshot carries the failure; nothing else to report.
            if let Err(e) = result {
                warn!(error = %e, "directory load failed");
            }
        });
    }

    fn run_confirmed(&self, confirm: ConfirmAction) {
        match confirm {
            ConfirmAction::CompleteTask { id, title } => {
                let console = self.console.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let notification = match console.complete_task(&id).await {
                        Ok(()) => Notification::success(format!("Completed \"{title}\"")),
                        Err(e) => Notification::error(e.to_string()),
                    };
                    let _ = tx.send(Action::Notify(notification));
                    let _ = tx.send(Action::RefreshTasks);
                });
            }
        }
    }

    // ── Rendering ─────────────────────────────────────────────────

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }
        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
        if let Some(ref confirm) = self.pending_confirm {
            Self::render_confirm_dialog(frame, area, confirm);
        }
        if let Some(ref modal) = self.modal {
            modal.render(frame, area);
        }
        if let Some((ref notification, _)) = self.notification {
            Self::render_notification(frame, area, notification);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(format!(" {} {} ", id.number(), id.label()), style))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    /// Search line while typing; otherwise connection, user, and key hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if self.search_active {
            let line = Line::from(vec![
                Span::styled(" / ", theme::key_hint_key()),
                Span::styled(self.search_query.clone(), Style::default().fg(theme::SKY_TEAL)),
                Span::styled("█", Style::default().fg(theme::SKY_TEAL)),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            return;
        }

        let connection = match &self.connection_status {
            ConnectionStatus::Connected => {
                Span::styled("● connected", Style::default().fg(theme::OPEN_GREEN))
            }
            ConnectionStatus::Connecting => {
                Span::styled("◐ connecting", Style::default().fg(theme::LAMP_YELLOW))
            }
            ConnectionStatus::Disconnected(reason) => Span::styled(
                format!("○ disconnected ({reason})"),
                Style::default().fg(theme::FULL_RED),
            ),
        };
        let user = self.session.as_ref().map_or_else(
            || Span::styled("not logged in", theme::key_hint()),
            |s| {
                Span::styled(
                    format!("{} ({})", s.user.name, s.role()),
                    Style::default().fg(theme::SKY_TEAL),
                )
            },
        );

        let mut spans = vec![Span::raw(" "), connection, Span::styled(" │ ", theme::key_hint()), user];
        if let Some(screen) = self.screens.get(&self.active_screen) {
            spans.push(Span::styled(" │ ", theme::key_hint()));
            spans.extend(hint_line(screen.hints()).spans);
        }
        spans.push(Span::styled(" │ ? help  q quit", theme::key_hint()));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let inner = render_panel(
            frame,
            area,
            "Keyboard Shortcuts",
            (60, 26),
            theme::border_focused(),
        );

        let section = |title: &'static str| {
            [
                Line::from(Span::styled(
                    format!("  {title}"),
                    Style::default().fg(theme::SKY_TEAL),
                )),
                Line::from(Span::styled(
                    format!("  {}", "─".repeat(title.chars().count())),
                    theme::key_hint(),
                )),
            ]
        };
        let row = |key: &'static str, label: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
                Span::styled(label, theme::key_hint()),
            ])
        };

        let mut help_text = vec![Line::from("")];
        help_text.extend(section("Navigation"));
        help_text.extend([
            row("1-3 Tab", "Switch screen"),
            row("j/k g/G", "Move, top, bottom"),
            row("Ctrl+d/u", "Page down, page up"),
            row("Enter", "Details"),
            row("/", "Filter the list"),
            Line::from(""),
        ]);
        help_text.extend(section("Shelters"));
        help_text.extend([
            row("r", "Reserve a bed"),
            row("t", "Cycle type filter"),
            row("f", "Search by flags"),
            row("R", "Reload"),
            row("l / L", "Log in, log out"),
            Line::from(""),
        ]);
        help_text.extend(section("Tasks"));
        help_text.extend([row("c", "Complete assigned task"), Line::from("")]);
        help_text.push(
            Line::from(Span::styled("Esc or ? to close", theme::key_hint()))
                .alignment(Alignment::Center),
        );

        frame.render_widget(Paragraph::new(help_text), inner);
    }

    fn render_confirm_dialog(frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
        let width = u16::try_from(confirm.to_string().chars().count())
            .unwrap_or(u16::MAX)
            .saturating_add(6)
            .clamp(36, 70);
        let inner = render_panel(
            frame,
            area,
            "Confirm",
            (width, 5),
            Style::default().fg(theme::LAMP_YELLOW),
        );

        let text = vec![
            Line::from(Span::styled(
                format!("  {confirm}"),
                Style::default().fg(theme::TEXT),
            )),
            Line::from(""),
            hint_line(&[("y", "confirm"), ("n", "cancel")]).alignment(Alignment::Center),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }

    /// Render a notification toast in the bottom-right corner.
    fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
        let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
        let width = msg_len.saturating_add(6).clamp(20, 60).min(area.width);
        let height = 3u16;

        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 2); // above status bar
        let toast_area = Rect::new(area.x + x, area.y + y, width, height);

        let (border_color, icon) = match notif.level {
            NotificationLevel::Success => (theme::OPEN_GREEN, "✓"),
            NotificationLevel::Error => (theme::FULL_RED, "✗"),
            NotificationLevel::Warning => (theme::LAMP_YELLOW, "!"),
            NotificationLevel::Info => (theme::SKY_TEAL, "·"),
        };

        frame.render_widget(Clear, toast_area);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_PANEL)),
            toast_area,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
            Span::styled(notif.message.clone(), Style::default().fg(theme::TEXT)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use shelterly_core::Role;

    fn app() -> App {
        let config =
            shelterly_config::profile_to_console_config(&shelterly_config::Profile::default())
                .unwrap();
        App::new(
            Console::new(config, None),
            LoginDefaults {
                email: String::new(),
                role: Role::Caseworker,
            },
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn number_keys_switch_screens() {
        let mut app = app();
        let action = app.handle_key_event(key(KeyCode::Char('3'))).unwrap();
        assert!(matches!(action, Some(Action::SwitchScreen(ScreenId::Tasks))));
    }

    #[test]
    fn open_modal_swallows_global_keys() {
        let mut app = app();
        app.open_login(None);
        let action = app.handle_key_event(key(KeyCode::Char('q'))).unwrap();
        assert!(action.is_none());

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let action = app.handle_key_event(ctrl_c).unwrap();
        assert!(matches!(action, Some(Action::Quit)));
    }

    #[test]
    fn search_mode_accumulates_query() {
        let mut app = app();
        app.process_action(&Action::OpenSearch).unwrap();
        app.handle_key_event(key(KeyCode::Char('c'))).unwrap();
        let action = app.handle_key_event(key(KeyCode::Char('a'))).unwrap();
        assert!(matches!(action, Some(Action::SearchInput(ref q)) if q == "ca"));

        let action = app.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(matches!(action, Some(Action::CloseSearch)));
    }

    #[test]
    fn confirm_dialog_takes_y_and_n() {
        let mut app = app();
        app.process_action(&Action::ShowConfirm(ConfirmAction::CompleteTask {
            id: RecordId::Numeric(1),
            title: "Park cleanup".into(),
        }))
        .unwrap();
        let action = app.handle_key_event(key(KeyCode::Char('n'))).unwrap();
        assert!(matches!(action, Some(Action::ConfirmNo)));
        app.process_action(&Action::ConfirmNo).unwrap();
        assert!(app.pending_confirm.is_none());
    }

    #[test]
    fn reserving_unknown_shelter_notifies() {
        let mut app = app();
        app.open_reserve(&RecordId::Numeric(42));
        assert!(app.modal.is_none());
        let (notification, _) = app.notification.as_ref().unwrap();
        assert_eq!(notification.level, NotificationLevel::Warning);
    }

    fn open_assign() -> Action {
        Action::OpenAssign {
            id: RecordId::Numeric(7),
            title: "Park cleanup".into(),
        }
    }

    #[test]
    fn assigning_without_session_asks_for_login() {
        let mut app = app();
        app.process_action(&open_assign()).unwrap();
        assert!(matches!(app.modal, Some(Modal::Login(_))));
    }

    #[test]
    fn assign_result_closes_or_keeps_the_form() {
        let mut app = app();
        let credentials = shelterly_core::session::LoginCredentials {
            email: "demo@example.com".into(),
            password: secrecy::SecretString::from("password".to_owned()),
            role: Role::Caseworker,
        };
        app.session = Some(Arc::new(shelterly_core::session::login(&credentials).unwrap()));

        app.process_action(&open_assign()).unwrap();
        assert!(matches!(app.modal, Some(Modal::Assign(_))));

        app.process_action(&Action::AssignFinished(Err("Task not found".into())))
            .unwrap();
        assert!(matches!(app.modal, Some(Modal::Assign(_))));

        app.process_action(&Action::AssignFinished(Ok("42".into())))
            .unwrap();
        assert!(app.modal.is_none());
        let (notification, _) = app.notification.as_ref().unwrap();
        assert_eq!(notification.level, NotificationLevel::Success);
        assert_eq!(notification.message, "Assigned \"Park cleanup\" to client 42");
        assert!(matches!(app.action_rx.try_recv(), Ok(Action::RefreshTasks)));
    }
}
