//! Screen implementations. Each screen is a top-level Component.

pub mod clients;
pub mod shelters;
pub mod tasks;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::TableState;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create screen components for the tab bar.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Shelters, Box::new(shelters::SheltersScreen::new())),
        (ScreenId::Clients, Box::new(clients::ClientsScreen::new())),
        (ScreenId::Tasks, Box::new(tasks::TasksScreen::new())),
    ]
}

/// Load state of a list fetched on demand (clients, tasks).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loading,
    Loaded,
    Failed(String),
}

// ── Table navigation ────────────────────────────────────────────────

/// Apply j/k, g/G, and Ctrl+d/u to a table selection. Returns `false`
/// when the key is not a navigation key.
#[allow(clippy::cast_sign_loss, clippy::as_conversions, clippy::cast_possible_wrap)]
pub fn navigate(state: &mut TableState, len: usize, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let delta: isize = match key.code {
        KeyCode::Char('j') | KeyCode::Down => 1,
        KeyCode::Char('k') | KeyCode::Up => -1,
        KeyCode::Char('d') if ctrl => 10,
        KeyCode::Char('u') if ctrl => -10,
        KeyCode::Char('g') => isize::MIN / 2,
        KeyCode::Char('G') => isize::MAX / 2,
        _ => return false,
    };
    if len == 0 {
        return true;
    }
    let current = state.selected().unwrap_or(0) as isize;
    let next = current.saturating_add(delta).clamp(0, len as isize - 1);
    state.select(Some(next as usize));
    true
}

/// Keep the selection inside `0..len` after the list changed.
pub fn clamp_selection(state: &mut TableState, len: usize) {
    match state.selected() {
        _ if len == 0 => state.select(None),
        Some(i) if i >= len => state.select(Some(len - 1)),
        None => state.select(Some(0)),
        Some(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn navigation_clamps_to_bounds() {
        let mut state = TableState::default();
        assert!(navigate(&mut state, 5, key(KeyCode::Char('G'))));
        assert_eq!(state.selected(), Some(4));
        assert!(navigate(&mut state, 5, key(KeyCode::Char('j'))));
        assert_eq!(state.selected(), Some(4));
        assert!(navigate(&mut state, 5, key(KeyCode::Char('g'))));
        assert_eq!(state.selected(), Some(0));
        assert!(navigate(
            &mut state,
            5,
            KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL)
        ));
        assert_eq!(state.selected(), Some(4));
        assert!(!navigate(&mut state, 5, key(KeyCode::Char('x'))));
    }

    #[test]
    fn clamp_handles_shrink_and_empty() {
        let mut state = TableState::default();
        state.select(Some(7));
        clamp_selection(&mut state, 3);
        assert_eq!(state.selected(), Some(2));
        clamp_selection(&mut state, 0);
        assert_eq!(state.selected(), None);
        clamp_selection(&mut state, 2);
        assert_eq!(state.selected(), Some(0));
    }
}
