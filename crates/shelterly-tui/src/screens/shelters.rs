//! Shelters screen: the directory table, type tabs, server-search flags,
//! and the entry points for reserving and logging in.

use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};
use strum::IntoEnumIterator;

use shelterly_core::{
    DirectorySnapshot, DirectoryState, ReserveControl, SearchCriteria, Session, ShelterType,
    ShelterView,
};

use crate::action::Action;
use crate::component::Component;
use crate::screens::{clamp_selection, navigate};
use crate::theme;
use crate::widgets::input::{hint_line, render_centered_panel, render_selector, render_toggle};
use crate::widgets::sub_tabs;

/// Next step in the `t` cycle: All → each type in order → All.
pub fn next_type_filter(current: Option<ShelterType>) -> Option<ShelterType> {
    match current {
        None => ShelterType::iter().next(),
        Some(t) => ShelterType::iter().skip_while(|x| *x != t).nth(1),
    }
}

fn cycle_type(current: Option<ShelterType>, forward: bool) -> Option<ShelterType> {
    if forward {
        return next_type_filter(current);
    }
    let all: Vec<_> = ShelterType::iter().collect();
    match current {
        None => all.last().copied(),
        Some(t) => {
            let idx = all.iter().position(|x| *x == t).unwrap_or(0);
            idx.checked_sub(1).and_then(|i| all.get(i).copied())
        }
    }
}

/// `"Tiny Home, pets, active only"`; empty for no criteria.
pub fn describe_criteria(criteria: &SearchCriteria) -> String {
    let mut parts = Vec::new();
    if let Some(t) = criteria.shelter_type {
        parts.push(t.label());
    }
    if criteria.allows_pets {
        parts.push("pets");
    }
    if criteria.allows_partner {
        parts.push("partner");
    }
    if criteria.is_active {
        parts.push("active only");
    }
    parts.join(", ")
}

fn reserve_label(control: ReserveControl) -> &'static str {
    match control {
        ReserveControl::Enabled => "Reserve",
        ReserveControl::RequiresLogin => "Log in to reserve",
        ReserveControl::Disabled => "Full",
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "─" }
}

// ── Server-search flags panel ───────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagField {
    Type,
    Pets,
    Partner,
    Active,
}

impl FlagField {
    const ORDER: [Self; 4] = [Self::Type, Self::Pets, Self::Partner, Self::Active];

    fn step(self, forward: bool) -> Self {
        let len = Self::ORDER.len();
        let idx = Self::ORDER.iter().position(|&f| f == self).unwrap_or(0);
        let next = if forward { idx + 1 } else { idx + len - 1 };
        Self::ORDER[next % len]
    }
}

#[derive(Debug, Clone)]
struct SearchFlags {
    criteria: SearchCriteria,
    field: FlagField,
}

impl SearchFlags {
    fn new(criteria: SearchCriteria) -> Self {
        Self {
            criteria,
            field: FlagField::Type,
        }
    }

    /// `Ok(None)` keeps the panel open; `Err(())` closes it with no action.
    fn handle_key_event(&mut self, key: KeyEvent) -> std::result::Result<Option<Action>, ()> {
        match key.code {
            KeyCode::Esc => return Err(()),
            KeyCode::Enter => return Ok(Some(Action::ServerSearch(self.criteria))),
            KeyCode::Char('x') => return Ok(Some(Action::ClearServerSearch)),
            KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => self.field = self.field.step(true),
            KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => {
                self.field = self.field.step(false);
            }
            KeyCode::Left | KeyCode::Right if self.field == FlagField::Type => {
                self.criteria.shelter_type =
                    cycle_type(self.criteria.shelter_type, key.code == KeyCode::Right);
            }
            KeyCode::Char(' ') => match self.field {
                FlagField::Type => {
                    self.criteria.shelter_type = next_type_filter(self.criteria.shelter_type);
                }
                FlagField::Pets => self.criteria.allows_pets = !self.criteria.allows_pets,
                FlagField::Partner => self.criteria.allows_partner = !self.criteria.allows_partner,
                FlagField::Active => self.criteria.is_active = !self.criteria.is_active,
            },
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let inner = render_centered_panel(frame, area, "Search shelters", 48, 14);
        let layout = Layout::vertical([
            Constraint::Length(4), // type
            Constraint::Length(1), // pets
            Constraint::Length(1), // partner
            Constraint::Length(1), // active
            Constraint::Min(1),
            Constraint::Length(1), // hints
        ])
        .horizontal_margin(2)
        .split(inner);

        let type_label = self.criteria.shelter_type.map_or("Any", ShelterType::label);
        render_selector(
            frame,
            layout[0],
            "Shelter type",
            type_label,
            self.field == FlagField::Type,
        );
        render_toggle(
            frame,
            layout[1],
            "Allows pets",
            self.criteria.allows_pets,
            self.field == FlagField::Pets,
        );
        render_toggle(
            frame,
            layout[2],
            "Allows partner",
            self.criteria.allows_partner,
            self.field == FlagField::Partner,
        );
        render_toggle(
            frame,
            layout[3],
            "Active only",
            self.criteria.is_active,
            self.field == FlagField::Active,
        );
        frame.render_widget(
            Paragraph::new(hint_line(&[
                ("Space", "toggle"),
                ("Enter", "search"),
                ("x", "clear"),
                ("Esc", "close"),
            ]))
            .alignment(Alignment::Center),
            layout[5],
        );
    }
}

// ── Screen ──────────────────────────────────────────────────────────

pub struct SheltersScreen {
    focused: bool,
    snapshot: DirectorySnapshot,
    session: Option<Arc<Session>>,
    views: Vec<ShelterView>,
    table_state: TableState,
    detail_open: bool,
    flags: Option<SearchFlags>,
    loaded_at: Option<Instant>,
}

impl SheltersScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            snapshot: DirectorySnapshot::default(),
            session: None,
            views: Vec::new(),
            table_state: TableState::default(),
            detail_open: false,
            flags: None,
            loaded_at: None,
        }
    }

    fn recompute_views(&mut self) {
        self.views = ShelterView::from_list(&self.snapshot.visible, self.session.as_deref());
        clamp_selection(&mut self.table_state, self.views.len());
    }

    fn selected_view(&self) -> Option<&ShelterView> {
        self.table_state.selected().and_then(|i| self.views.get(i))
    }

    fn type_tab_index(&self) -> usize {
        self.snapshot
            .filter
            .shelter_type
            .and_then(|t| ShelterType::iter().position(|x| x == t))
            .map_or(0, |i| i + 1)
    }

    fn status_line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        match &self.snapshot.state {
            DirectoryState::Idle => {}
            DirectoryState::Loading => {
                spans.push(Span::styled("Loading shelters...", theme::warning_text()));
            }
            DirectoryState::Failed { message } => {
                spans.push(Span::styled(message.clone(), theme::error_text()));
                spans.push(Span::styled("  (R to retry)", theme::key_hint()));
            }
            DirectoryState::Loaded => {
                if let Some(at) = self.loaded_at {
                    let secs = Duration::from_secs(at.elapsed().as_secs());
                    spans.push(Span::styled(
                        format!("updated {} ago", humantime::format_duration(secs)),
                        theme::key_hint(),
                    ));
                }
            }
        }
        if let Some(criteria) = self.snapshot.criteria.filter(|c| !c.is_empty()) {
            spans.push(Span::styled(
                format!("  search: {}", describe_criteria(&criteria)),
                Style::default().fg(theme::DUSK_ROSE),
            ));
        }
        if self.snapshot.inconsistent > 0 {
            spans.push(Span::styled(
                format!(
                    "  {} record(s) with inconsistent bed counts",
                    self.snapshot.inconsistent
                ),
                theme::warning_text(),
            ));
        }
        Line::from(spans)
    }

    fn empty_message(&self) -> Option<&'static str> {
        if !self.views.is_empty() {
            return None;
        }
        Some(match self.snapshot.state {
            DirectoryState::Idle | DirectoryState::Loading => "Loading shelters...",
            DirectoryState::Failed { .. } => "No shelters to show.",
            DirectoryState::Loaded if self.snapshot.results.is_empty() => "No shelters found.",
            DirectoryState::Loaded => "No shelters match the current filter.",
        })
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        if let Some(msg) = self.empty_message() {
            frame.render_widget(
                Paragraph::new(Span::styled(msg, theme::key_hint())).alignment(Alignment::Center),
                area,
            );
            return;
        }

        let header = Row::new(
            ["Name", "Type", "City", "Beds", "Pets", "Partner", ""]
                .into_iter()
                .map(|h| Cell::from(h).style(theme::table_header())),
        );

        let rows = self.views.iter().map(|view| {
            let s = &view.shelter;
            let beds_style = theme::availability(s.has_availability(), view.low_availability);
            let reserve_style = match view.reserve {
                ReserveControl::Enabled => Style::default().fg(theme::OPEN_GREEN),
                ReserveControl::RequiresLogin => theme::warning_text(),
                ReserveControl::Disabled => theme::key_hint(),
            };
            Row::new(vec![
                Cell::from(s.name.clone()),
                Cell::from(s.shelter_type.map_or("─", ShelterType::label)),
                Cell::from(s.address.city.clone()),
                Cell::from(view.occupancy_label()).style(beds_style),
                Cell::from(yes_no(s.allows_pets)),
                Cell::from(yes_no(s.allows_partner)),
                Cell::from(reserve_label(view.reserve)).style(reserve_style),
            ])
            .style(theme::table_row())
        });

        let table = Table::new(
            rows,
            [
                Constraint::Fill(3),
                Constraint::Length(18),
                Constraint::Fill(1),
                Constraint::Length(12),
                Constraint::Length(5),
                Constraint::Length(8),
                Constraint::Length(18),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected());

        frame.render_stateful_widget(table, area, &mut self.table_state.clone());
    }

    fn render_detail(frame: &mut Frame, area: Rect, view: &ShelterView) {
        let s = &view.shelter;
        let block = Block::default()
            .title(format!(" {} ", s.name))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let field = |label: &'static str, value: String| {
            Line::from(vec![
                Span::styled(format!("  {label:<14}"), Style::default().fg(theme::TEXT)),
                Span::styled(value, Style::default().fg(theme::SKY_TEAL)),
            ])
        };
        let opt = |v: Option<&str>| v.unwrap_or("─").to_owned();

        let mut lines = vec![
            field("Address", s.address.one_line()),
            field("Beds", view.occupancy_label()),
            field("Phone", opt(s.phone.as_deref())),
            field("Email", opt(s.email.as_deref())),
            field("Operator", opt(s.operating_organization.as_deref())),
            field(
                "Updated",
                s.last_updated
                    .map_or_else(|| "─".into(), |t| t.format("%Y-%m-%d %H:%M").to_string()),
            ),
        ];
        if let Some(ref description) = s.description {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("  {description}"),
                theme::table_row(),
            )));
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

impl Component for SheltersScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(ref mut flags) = self.flags {
            return Ok(match flags.handle_key_event(key) {
                Err(()) => {
                    self.flags = None;
                    None
                }
                Ok(Some(action)) => {
                    self.flags = None;
                    Some(action)
                }
                Ok(None) => None,
            });
        }

        if navigate(&mut self.table_state, self.views.len(), key) {
            return Ok(None);
        }

        let action = match key.code {
            KeyCode::Enter => {
                self.detail_open = !self.detail_open && self.selected_view().is_some();
                None
            }
            KeyCode::Esc if self.detail_open => {
                self.detail_open = false;
                None
            }
            KeyCode::Char('t') => Some(Action::SetTypeFilter(next_type_filter(
                self.snapshot.filter.shelter_type,
            ))),
            KeyCode::Char('f') => {
                self.flags = Some(SearchFlags::new(self.snapshot.criteria.unwrap_or_default()));
                None
            }
            KeyCode::Char('r') => self
                .selected_view()
                .map(|v| Action::OpenReserve(v.shelter.id.clone())),
            KeyCode::Char('R') => Some(Action::RefreshDirectory),
            KeyCode::Char('l') => Some(Action::OpenLogin(None)),
            KeyCode::Char('L') => Some(Action::Logout),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::DirectoryUpdated(snapshot) => {
                if snapshot.state == DirectoryState::Loaded
                    && !Arc::ptr_eq(&snapshot.results, &self.snapshot.results)
                {
                    self.loaded_at = Some(Instant::now());
                }
                self.snapshot = snapshot.clone();
                self.recompute_views();
            }
            Action::SessionChanged(session) => {
                self.session.clone_from(session);
                self.recompute_views();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let total = self.snapshot.results.len();
        let shown = self.views.len();
        let title = if self.snapshot.filter.text.is_empty() {
            format!(" Shelters ({shown}/{total}) ")
        } else {
            format!(" Shelters ({shown}/{total}) [\"{}\"] ", self.snapshot.filter.text)
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let detail = self.selected_view().filter(|_| self.detail_open);
        let (list_area, detail_area) = if detail.is_some() {
            let chunks = Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(inner);
            (chunks[0], Some(chunks[1]))
        } else {
            (inner, None)
        };

        let layout = Layout::vertical([
            Constraint::Length(1), // type tabs
            Constraint::Length(1), // status
            Constraint::Min(1),    // table
        ])
        .split(list_area);

        let mut labels = vec!["All"];
        labels.extend(ShelterType::iter().map(ShelterType::label));
        frame.render_widget(
            Paragraph::new(sub_tabs::render_sub_tabs(&labels, self.type_tab_index())),
            layout[0],
        );
        frame.render_widget(Paragraph::new(self.status_line()), layout[1]);
        self.render_table(frame, layout[2]);

        if let (Some(view), Some(area)) = (detail, detail_area) {
            Self::render_detail(frame, area, view);
        }

        if let Some(ref flags) = self.flags {
            flags.render(frame, area);
        }
    }

    fn captures_input(&self) -> bool {
        self.flags.is_some()
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("r", "reserve"),
            ("/", "filter"),
            ("t", "type"),
            ("f", "search"),
            ("R", "refresh"),
            ("l", "login"),
            ("L", "logout"),
        ]
    }
}
