// ── Reactive user stream ──
//
// Subscription type for consuming user collection changes from the store.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::watch;
use tokio_stream::Stream;
use tokio_stream::wrappers::WatchStream;

use userdeck_api::User;

/// A subscription to the published user collection.
///
/// Provides both point-in-time snapshot access and reactive change
/// notification via the `changed()` method or by converting to a `Stream`.
pub struct UserStream {
    current: Arc<Vec<Arc<User>>>,
    receiver: watch::Receiver<Arc<Vec<Arc<User>>>>,
}

impl UserStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<Vec<Arc<User>>>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Get the snapshot captured at creation time.
    pub fn current(&self) -> &Arc<Vec<Arc<User>>> {
        &self.current
    }

    /// Get the latest snapshot (may have changed since creation).
    pub fn latest(&self) -> Arc<Vec<Arc<User>>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` if the store has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<Vec<Arc<User>>>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> UserWatchStream {
        UserWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields a new snapshot each time the collection is replaced.
pub struct UserWatchStream {
    inner: WatchStream<Arc<Vec<Arc<User>>>>,
}

impl Stream for UserWatchStream {
    type Item = Arc<Vec<Arc<User>>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // WatchStream is Unpin when the item type is Unpin, which the
        // Arc snapshot always is.
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
