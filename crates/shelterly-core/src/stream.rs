// ── Reactive directory stream ──
//
// Subscription type for consuming directory changes.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::directory::DirectorySnapshot;

/// A subscription to the shelter directory.
///
/// Provides both point-in-time snapshot access and reactive change
/// notification via `changed()` or by converting to a `Stream`.
pub struct DirectoryStream {
    current: DirectorySnapshot,
    receiver: watch::Receiver<DirectorySnapshot>,
}

impl DirectoryStream {
    pub(crate) fn new(receiver: watch::Receiver<DirectorySnapshot>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation time (or at the last `changed()`).
    pub fn current(&self) -> &DirectorySnapshot {
        &self.current
    }

    /// The latest snapshot (may have changed since creation).
    pub fn latest(&self) -> DirectorySnapshot {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` once the directory has been dropped.
    pub async fn changed(&mut self) -> Option<DirectorySnapshot> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> DirectoryWatchStream {
        DirectoryWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter yielding a snapshot each time the directory changes.
pub struct DirectoryWatchStream {
    inner: WatchStream<DirectorySnapshot>,
}

impl Stream for DirectoryWatchStream {
    type Item = DirectorySnapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use crate::directory::{DirectoryState, ShelterDirectory};

    #[tokio::test]
    async fn changed_reports_state_transitions() {
        let dir = ShelterDirectory::new();
        let mut stream = dir.subscribe();
        assert_eq!(stream.current().state, DirectoryState::Idle);

        let token = dir.begin_request();
        let snap = stream.changed().await;
        assert_eq!(snap.map(|s| s.state), Some(DirectoryState::Loading));

        dir.complete(token, None, Ok(Vec::new()));
        assert_eq!(stream.latest().state, DirectoryState::Loaded);
    }
}
