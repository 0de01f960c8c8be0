//! Data bridge: connects [Console] watch channels to TUI actions.
//!
//! Runs as a background task: performs the initial directory load, then
//! forwards every directory snapshot, session change, and connection-state
//! transition as an [`Action`] through the TUI's action channel.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use shelterly_core::{ConnectionState, Console};

use crate::action::Action;

/// Connect the console, kick off the first fetch, and stream changes
/// until cancelled.
pub async fn spawn_data_bridge(
    console: Console,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    if let Err(e) = console.connect().await {
        warn!(error = %e, "failed to connect console");
        let _ = action_tx.send(Action::Disconnected(e.to_string()));
        return;
    }
    let _ = action_tx.send(Action::Connected);

    let mut directory = console.shelters();
    let mut session = console.session_changes();
    let mut conn_state = console.connection_state();

    // Initial snapshots so screens render the right state immediately
    let _ = action_tx.send(Action::DirectoryUpdated(directory.current().clone()));
    let _ = action_tx.send(Action::SessionChanged(session.borrow_and_update().clone()));

    // A failure lands in the snapshot as `Failed`; the error is only logged.
    let loader = console.clone();
    tokio::spawn(async move {
        if let Err(e) = loader.fetch_all().await {
            warn!(error = %e, "initial shelter load failed");
        }
    });

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(snapshot) = directory.changed() => {
                debug!(visible = snapshot.visible.len(), "dispatching DirectoryUpdated");
                let _ = action_tx.send(Action::DirectoryUpdated(snapshot));
            }
            Ok(()) = session.changed() => {
                let current = session.borrow_and_update().clone();
                let _ = action_tx.send(Action::SessionChanged(current));
            }
            Ok(()) = conn_state.changed() => {
                let state = conn_state.borrow_and_update().clone();
                match state {
                    ConnectionState::Connected => {
                        let _ = action_tx.send(Action::Connected);
                    }
                    ConnectionState::Disconnected => {
                        let _ = action_tx.send(Action::Disconnected("disconnected".into()));
                    }
                    ConnectionState::Failed => {
                        let _ = action_tx.send(Action::Disconnected("connection failed".into()));
                    }
                }
            }
        }
    }

    console.disconnect().await;
    debug!("data bridge shut down");
}
