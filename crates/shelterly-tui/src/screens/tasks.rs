//! Tasks screen: work opportunities, assignment of open ones, and
//! completion of assigned ones.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};

use shelterly_core::{Task, TaskStatus};

use crate::action::{Action, ConfirmAction, Notification};
use crate::component::Component;
use crate::screen::ScreenId;
use crate::screens::{LoadState, clamp_selection, navigate};
use crate::theme;

fn status_style(status: TaskStatus) -> Style {
    match status {
        TaskStatus::Open => Style::default().fg(theme::OPEN_GREEN),
        TaskStatus::Assigned => Style::default().fg(theme::LAMP_YELLOW),
        _ => theme::key_hint(),
    }
}

fn dash(value: Option<&str>) -> String {
    value.unwrap_or("─").to_owned()
}

pub struct TasksScreen {
    focused: bool,
    tasks: Arc<Vec<Task>>,
    filtered: Vec<usize>,
    search_query: String,
    table_state: TableState,
    state: LoadState,
    detail_open: bool,
}

impl TasksScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            tasks: Arc::new(Vec::new()),
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
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| {
                q.is_empty()
                    || t.title.to_lowercase().contains(&q)
                    || t.location
                        .as_deref()
                        .is_some_and(|l| l.to_lowercase().contains(&q))
                    || t.status.to_string().to_lowercase().contains(&q)
            })
            .map(|(i, _)| i)
            .collect();
        clamp_selection(&mut self.table_state, self.filtered.len());
    }

    fn selected(&self) -> Option<&Task> {
        self.table_state
            .selected()
            .and_then(|i| self.filtered.get(i))
            .and_then(|&idx| self.tasks.get(idx))
    }

    fn request_complete(&self) -> Option<Action> {
        let task = self.selected()?;
        if task.is_completable() {
            Some(Action::ShowConfirm(ConfirmAction::CompleteTask {
                id: task.id.clone(),
                title: task.title.clone(),
            }))
        } else {
            Some(Action::Notify(Notification::warning(
                "Only assigned tasks can be completed",
            )))
        }
    }

    fn request_assign(&self) -> Option<Action> {
        let task = self.selected()?;
        if task.is_assignable() {
            Some(Action::OpenAssign {
                id: task.id.clone(),
                title: task.title.clone(),
            })
        } else {
            Some(Action::Notify(Notification::warning(
                "Only open tasks can be assigned",
            )))
        }
    }

    fn render_detail(frame: &mut Frame, area: Rect, task: &Task) {
        let block = Block::default()
            .title(format!(" {}  ·  {} ", task.title, task.status))
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
        let contact = match (&task.contact_name, &task.contact_phone) {
            (Some(name), Some(phone)) => format!("{name} ({phone})"),
            (Some(name), None) => name.clone(),
            (None, Some(phone)) => phone.clone(),
            (None, None) => "─".into(),
        };
        let mut lines = vec![
            field("Location", dash(task.location.as_deref())),
            field("Duration", dash(task.estimated_duration.as_deref())),
            field("Compensation", dash(task.compensation_details.as_deref())),
            field("Contact", contact),
            field("Client", dash(task.client_id.as_deref())),
        ];
        if let Some(ref description) = task.description {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("  {description}"),
                theme::table_row(),
            )));
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let message = match &self.state {
            LoadState::NotLoaded | LoadState::Loading if self.tasks.is_empty() => {
                Some(Span::styled("Loading tasks...", theme::key_hint()))
            }
            LoadState::Failed(msg) if self.tasks.is_empty() => {
                Some(Span::styled(msg.clone(), theme::error_text()))
            }
            _ if self.filtered.is_empty() => Some(Span::styled("No tasks to show.", theme::key_hint())),
            _ => None,
        };
        if let Some(span) = message {
            frame.render_widget(Paragraph::new(span).alignment(Alignment::Center), area);
            return;
        }

        let header = Row::new(
            ["Title", "Status", "Location", "Scheduled", "Client"]
                .into_iter()
                .map(|h| Cell::from(h).style(theme::table_header())),
        );
        let rows = self
            .filtered
            .iter()
            .filter_map(|&i| self.tasks.get(i))
            .map(|t| {
                Row::new(vec![
                    Cell::from(t.title.clone()),
                    Cell::from(t.status.to_string()).style(status_style(t.status)),
                    Cell::from(dash(t.location.as_deref())),
                    Cell::from(t.scheduled_at.map_or_else(
                        || "─".into(),
                        |at| at.format("%Y-%m-%d %H:%M").to_string(),
                    )),
                    Cell::from(dash(t.client_id.as_deref())),
                ])
                .style(theme::table_row())
            });

        let table = Table::new(
            rows,
            [
                Constraint::Fill(3),
                Constraint::Length(10),
                Constraint::Fill(2),
                Constraint::Length(17),
                Constraint::Length(8),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected());

        frame.render_stateful_widget(table, area, &mut self.table_state.clone());
    }
}

impl Component for TasksScreen {
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
            KeyCode::Char('a') => self.request_assign(),
            KeyCode::Char('c') => self.request_complete(),
            KeyCode::Char('R') => Some(Action::RefreshTasks),
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SwitchScreen(ScreenId::Tasks) if self.state == LoadState::NotLoaded => {
                return Ok(Some(Action::RefreshTasks));
            }
            Action::RefreshTasks => self.state = LoadState::Loading,
            Action::TasksLoaded(Ok(tasks)) => {
                self.tasks = Arc::clone(tasks);
                self.state = LoadState::Loaded;
                self.recompute_filtered();
            }
            Action::TasksLoaded(Err(msg)) => self.state = LoadState::Failed(msg.clone()),
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
        let total = self.tasks.len();
        let title = if self.search_query.is_empty() {
            format!(" Tasks ({shown}/{total}) ")
        } else {
            format!(" Tasks ({shown}/{total}) [\"{}\"] ", self.search_query)
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

        if let Some(task) = self.selected().filter(|_| self.detail_open) {
            let chunks = Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(inner);
            self.render_table(frame, chunks[0]);
            Self::render_detail(frame, chunks[1], task);
        } else {
            self.render_table(frame, inner);
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("Enter", "details"),
            ("a", "assign"),
            ("c", "complete"),
            ("/", "filter"),
            ("R", "refresh"),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use shelterly_core::RecordId;

    fn task(id: i64, title: &str, status: TaskStatus) -> Task {
        Task {
            id: RecordId::Numeric(id),
            title: title.into(),
            description: None,
            location: Some("Downtown".into()),
            status,
            client_id: None,
            scheduled_at: None,
            estimated_duration: None,
            compensation_details: None,
            contact_name: None,
            contact_phone: None,
            last_updated: None,
        }
    }

    fn loaded() -> TasksScreen {
        let mut screen = TasksScreen::new();
        let list = Arc::new(vec![
            task(1, "Park cleanup", TaskStatus::Open),
            task(2, "Food bank shift", TaskStatus::Assigned),
        ]);
        screen.update(&Action::TasksLoaded(Ok(list))).unwrap();
        screen
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn complete_asks_for_confirmation_on_assigned_task() {
        let mut screen = loaded();
        screen.handle_key_event(key('j')).unwrap();
        let action = screen.handle_key_event(key('c')).unwrap();
        match action {
            Some(Action::ShowConfirm(ConfirmAction::CompleteTask { id, title })) => {
                assert_eq!(id, RecordId::Numeric(2));
                assert_eq!(title, "Food bank shift");
            }
            other => panic!("expected confirmation, got {other:?}"),
        }
    }

    #[test]
    fn open_task_cannot_be_completed() {
        let mut screen = loaded();
        let action = screen.handle_key_event(key('c')).unwrap();
        assert!(matches!(action, Some(Action::Notify(_))));
    }

    #[test]
    fn assign_opens_form_only_for_open_tasks() {
        let mut screen = loaded();
        match screen.handle_key_event(key('a')).unwrap() {
            Some(Action::OpenAssign { id, title }) => {
                assert_eq!(id, RecordId::Numeric(1));
                assert_eq!(title, "Park cleanup");
            }
            other => panic!("expected assign form, got {other:?}"),
        }

        screen.handle_key_event(key('j')).unwrap();
        let action = screen.handle_key_event(key('a')).unwrap();
        assert!(matches!(action, Some(Action::Notify(_))));
    }

    #[test]
    fn search_filters_by_status() {
        let mut screen = loaded();
        screen
            .update(&Action::SearchInput("assigned".into()))
            .unwrap();
        assert_eq!(screen.filtered, vec![1]);
    }
}
