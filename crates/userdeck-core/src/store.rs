// ── Reactive user store ──
//
// Storage for the published user collection. The collection is replaced
// wholesale on each successful fetch -- no incremental merge, no
// cross-fetch identity tracking beyond the `id` already on each record.
// Mutations are broadcast to subscribers via `watch` channels.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use userdeck_api::User;

use crate::stream::UserStream;

/// Reactive store for the published user collection.
///
/// Reads are cheap `Arc` clones of the current snapshot; every mutation
/// notifies `watch` subscribers. A failed load never touches the store,
/// so the last successful payload stays visible while disconnected.
pub struct UserStore {
    users: watch::Sender<Arc<Vec<Arc<User>>>>,
    fetched_at: watch::Sender<Option<DateTime<Utc>>>,
}

impl UserStore {
    pub fn new() -> Self {
        let (users, _) = watch::channel(Arc::new(Vec::new()));
        let (fetched_at, _) = watch::channel(None);
        Self { users, fetched_at }
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Replace the whole collection and stamp `fetched_at` with now.
    pub fn apply_snapshot(&self, users: Vec<User>) {
        let snapshot: Arc<Vec<Arc<User>>> = Arc::new(users.into_iter().map(Arc::new).collect());
        self.users.send_replace(snapshot);
        self.fetched_at.send_replace(Some(Utc::now()));
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn users_snapshot(&self) -> Arc<Vec<Arc<User>>> {
        self.users.borrow().clone()
    }

    pub fn user_by_id(&self, id: u64) -> Option<Arc<User>> {
        self.users.borrow().iter().find(|u| u.id == id).cloned()
    }

    pub fn user_count(&self) -> usize {
        self.users.borrow().len()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_users(&self) -> UserStream {
        UserStream::new(self.users.subscribe())
    }

    pub fn subscribe_fetched_at(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.fetched_at.subscribe()
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        *self.fetched_at.borrow()
    }

    /// How long ago the last successful fetch landed, or `None` if the
    /// collection has never been fetched.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.fetched_at().map(|t| Utc::now() - t)
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
