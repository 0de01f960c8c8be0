//! Clients screen: registered clients with status and current shelter.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};

use shelterly_core::{Client, ClientStatus};

use crate::action::Action;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::screens::{LoadState, clamp_selection, navigate};
use crate::theme;

fn status_style(status: ClientStatus) -> Style {
    match status {
        ClientStatus::Sheltered | ClientStatus::PermanentlyHoused => {
            Style::default().fg(theme::OPEN_GREEN)
        }
        ClientStatus::SeekingPlacement => Style::default().fg(theme::LAMP_YELLOW),
        _ => theme::key_hint(),
    }
}

fn date(value: Option<chrono::NaiveDateTime>) -> String {
    value.map_or_else(|| "─".into(), |t| t.format("%Y-%m-%d").to_string())
}

pub struct ClientsScreen {
    focused: bool,
    clients: Arc<Vec<Client>>,
    filtered: Vec<usize>,
    search_query: String,
    table_state: TableState,
    state: LoadState,
    detail_open: bool,
}

impl ClientsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            clients: Arc::new(Vec::new()),
            filtered: Vec::new(),
            search_query: String::new(),
            table_state: TableState::default(),
            state: LoadState::default(),
            detail_open: false,
        }
    }

    fn recompute_filtered(&mut self) {
        let q = self.search_query.to_lowercase();
        self.filtered = self
            .clients
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                q.is_empty()
                    || c.display_name().to_lowercase().contains(&q)
                    || c.status.label().to_lowercase().contains(&q)
                    || c.current_shelter_name
                        .as_deref()
                        .is_some_and(|s| s.to_lowercase().contains(&q))
            })
            .map(|(i, _)| i)
            .collect();
        clamp_selection(&mut self.table_state, self.filtered.len());
    }

    fn selected(&self) -> Option<&Client> {
        self.table_state
            .selected()
            .and_then(|i| self.filtered.get(i))
            .and_then(|&idx| self.clients.get(idx))
    }

    fn render_detail(frame: &mut Frame, area: Rect, client: &Client) {
        let block = Block::default()
            .title(format!(" {}  ·  #{} ", client.display_name(), client.id))
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
        let lines = vec![
            field("Status", client.status.label().to_owned()),
            field(
                "Shelter",
                client
                    .current_shelter_name
                    .clone()
                    .unwrap_or_else(|| "─".into()),
            ),
            field("Registered", date(client.registration_date)),
            field("Last activity", date(client.last_activity_date)),
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "  {}",
                    client.caseworker_notes.as_deref().unwrap_or("No notes.")
                ),
                theme::table_row(),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let message = match &self.state {
            LoadState::NotLoaded | LoadState::Loading if self.clients.is_empty() => {
                Some(Span::styled("Loading clients...", theme::key_hint()))
            }
            LoadState::Failed(msg) if self.clients.is_empty() => {
                Some(Span::styled(msg.clone(), theme::error_text()))
            }
            _ if self.filtered.is_empty() => {
                Some(Span::styled("No clients to show.", theme::key_hint()))
            }
            _ => None,
        };
        if let Some(span) = message {
            frame.render_widget(Paragraph::new(span).alignment(Alignment::Center), area);
            return;
        }

        let header = Row::new(
            ["Name", "Status", "Shelter", "Registered", "Last activity"]
                .into_iter()
                .map(|h| Cell::from(h).style(theme::table_header())),
        );
        let rows = self
            .filtered
            .iter()
            .filter_map(|&i| self.clients.get(i))
            .map(|c| {
                Row::new(vec![
                    Cell::from(c.display_name()),
                    Cell::from(c.status.label()).style(status_style(c.status)),
                    Cell::from(c.current_shelter_name.clone().unwrap_or_else(|| "─".into())),
                    Cell::from(date(c.registration_date)),
                    Cell::from(date(c.last_activity_date)),
                ])
                .style(theme::table_row())
            });

        let table = Table::new(
            rows,
            [
                Constraint::Fill(2),
                Constraint::Length(20),
                Constraint::Fill(2),
                Constraint::Length(12),
                Constraint::Length(14),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected());

        frame.render_stateful_widget(table, area, &mut self.table_state.clone());
    }
}

impl Component for ClientsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if navigate(&mut self.table_state, self.filtered.len(), key) {
            return Ok(None);
        }
        Ok(match key.code {
            KeyCode::Enter => {
                self.detail_open = !self.detail_open && self.selected().is_some();
                None
            }
            KeyCode::Esc if self.detail_open => {
                self.detail_open = false;
                None
            }
            KeyCode::Char('R') => Some(Action::RefreshClients),
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SwitchScreen(ScreenId::Clients) if self.state == LoadState::NotLoaded => {
                return Ok(Some(Action::RefreshClients));
            }
            Action::RefreshClients => self.state = LoadState::Loading,
            Action::ClientsLoaded(Ok(clients)) => {
                self.clients = Arc::clone(clients);
                self.state = LoadState::Loaded;
                self.recompute_filtered();
            }
            Action::ClientsLoaded(Err(msg)) => self.state = LoadState::Failed(msg.clone()),
            Action::SearchInput(query) => {
                query.clone_into(&mut self.search_query);
                self.recompute_filtered();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let shown = self.filtered.len();
        let total = self.clients.len();
        let title = if self.search_query.is_empty() {
            format!(" Clients ({shown}/{total}) ")
        } else {
            format!(" Clients ({shown}/{total}) [\"{}\"] ", self.search_query)
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

        let detail = self.selected().filter(|_| self.detail_open);
        if let Some(client) = detail {
            let chunks = Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(inner);
            self.render_table(frame, chunks[0]);
            Self::render_detail(frame, chunks[1], client);
        } else {
            self.render_table(frame, inner);
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("Enter", "details"), ("/", "filter"), ("R", "refresh")]
    }
}
