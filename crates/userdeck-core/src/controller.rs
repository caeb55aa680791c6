// ── Directory controller ──
//
// Full lifecycle management of the user directory: connectivity
// probing, data loading, passive reconnection while offline, and
// reactive state publication through watch channels.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::DirectoryConfig;
use crate::error::DirectoryError;
use crate::store::UserStore;

use userdeck_api::{DirectoryClient, TransportConfig};

// ── ConnectionState ──────────────────────────────────────────────

/// Connectivity verdict observable by consumers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// A probe is in flight and no verdict has landed yet.
    #[default]
    Checking,
    Connected,
    Disconnected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checking => write!(f, "checking"),
            Self::Connected => write!(f, "connected"),
            Self::Disconnected => write!(f, "disconnected"),
        }
    }
}

// ── InfoMessage ──────────────────────────────────────────────────

/// Transient progress banner published during a load cycle.
///
/// Cleared automatically after [`DirectoryConfig::info_message_ttl`],
/// whatever the cycle's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoMessage {
    Connecting,
    LoadingData,
}

impl fmt::Display for InfoMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting => write!(f, "Connecting to the server..."),
            Self::LoadingData => write!(f, "Loading user data..."),
        }
    }
}

// ── Directory ────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<DirectoryInner>`. Owns the HTTP client,
/// the published user store, and the passive reconnection task. All
/// observable state flows through watch channels, so consumers can
/// either snapshot or subscribe.
#[derive(Clone)]
pub struct Directory {
    inner: Arc<DirectoryInner>,
}

struct DirectoryInner {
    config: DirectoryConfig,
    client: DirectoryClient,
    store: UserStore,
    connection_state: watch::Sender<ConnectionState>,
    loading: watch::Sender<bool>,
    last_error: watch::Sender<Option<DirectoryError>>,
    info_message: watch::Sender<Option<InfoMessage>>,
    attempts: watch::Sender<u32>,
    /// True while a load cycle runs — overlapping `load()` calls no-op.
    load_in_flight: AtomicBool,
    /// One-time latch for spawning the passive reconnection task.
    reconnect_spawned: AtomicBool,
    /// Bumped on every banner publication so a stale clear timer can
    /// tell it was superseded.
    info_generation: AtomicU64,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Directory {
    /// Create a new Directory from configuration. Does NOT touch the
    /// network -- call [`load()`](Self::load) to probe and fetch.
    pub fn new(config: DirectoryConfig) -> Result<Self, DirectoryError> {
        let transport = TransportConfig {
            probe_timeout: config.probe_timeout,
            fetch_timeout: config.fetch_timeout,
            ..TransportConfig::default()
        };
        let client = DirectoryClient::new(config.endpoint.clone(), &transport)?;

        let (connection_state, _) = watch::channel(ConnectionState::Checking);
        let (loading, _) = watch::channel(false);
        let (last_error, _) = watch::channel(None);
        let (info_message, _) = watch::channel(None);
        let (attempts, _) = watch::channel(0);

        Ok(Self {
            inner: Arc::new(DirectoryInner {
                config,
                client,
                store: UserStore::new(),
                connection_state,
                loading,
                last_error,
                info_message,
                attempts,
                load_in_flight: AtomicBool::new(false),
                reconnect_spawned: AtomicBool::new(false),
                info_generation: AtomicU64::new(0),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Run one full load cycle: probe, then fetch, then publish.
    ///
    /// Overlapping calls are suppressed -- if a cycle is already running
    /// this returns `Ok(())` without touching the network. The cycle's
    /// outcome is always observable through the published surface, so
    /// callers may discard the returned `Result`.
    pub async fn load(&self) -> Result<(), DirectoryError> {
        if self
            .inner
            .load_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("load already in flight -- ignoring");
            return Ok(());
        }

        self.ensure_reconnect_task().await;

        self.inner.loading.send_replace(true);
        self.inner.last_error.send_replace(None);
        self.publish_info(InfoMessage::Connecting);

        let result = self.run_load().await;

        if let Err(ref e) = result {
            warn!(error = %e, "load failed");
            self.inner.last_error.send_replace(Some(e.clone()));
            self.set_state(ConnectionState::Disconnected);
        }

        self.inner.loading.send_replace(false);
        self.schedule_info_clear();
        self.inner.load_in_flight.store(false, Ordering::Release);

        result
    }

    async fn run_load(&self) -> Result<(), DirectoryError> {
        if !self.probe().await {
            return Err(DirectoryError::ConnectionFailed);
        }

        self.publish_info(InfoMessage::LoadingData);

        let users = self.inner.client.fetch_users().await?;
        let count = users.len();
        self.inner.store.apply_snapshot(users);
        self.set_state(ConnectionState::Connected);
        info!(users = count, "directory load complete");
        Ok(())
    }

    /// Probe endpoint reachability without touching the data path.
    ///
    /// Publishes the `Checking -> Connected | Disconnected` transition
    /// and returns the verdict. No retries here -- retry policy lives
    /// with the caller.
    pub async fn probe(&self) -> bool {
        self.ensure_reconnect_task().await;
        self.set_state(ConnectionState::Checking);

        match self.inner.client.probe().await {
            Ok(()) => {
                debug!("probe ok");
                self.set_state(ConnectionState::Connected);
                true
            }
            Err(e) => {
                debug!(error = %e, "probe failed");
                self.set_state(ConnectionState::Disconnected);
                false
            }
        }
    }

    /// Manual retry: bump the visible attempt counter, then run a full
    /// load cycle. The counter is display-only and never feeds backoff.
    pub async fn retry(&self) -> Result<(), DirectoryError> {
        self.inner.attempts.send_modify(|n| *n += 1);
        self.load().await
    }

    /// Tear down background tasks.
    ///
    /// The published surface stays readable and the store keeps its
    /// last snapshot; only the passive reconnection stops.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("directory shut down");
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// One-shot: load, run closure, shut down.
    ///
    /// Tailored to CLI runs: disables passive reconnection since the
    /// process exits after a single request-response cycle.
    pub async fn oneshot<F, Fut, T>(config: DirectoryConfig, f: F) -> Result<T, DirectoryError>
    where
        F: FnOnce(Directory) -> Fut,
        Fut: std::future::Future<Output = Result<T, DirectoryError>>,
    {
        let mut cfg = config;
        cfg.reconnect_interval = Duration::ZERO;

        let directory = Directory::new(cfg)?;
        directory.load().await?;
        let result = f(directory.clone()).await;
        directory.shutdown().await;
        result
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to connection state changes.
    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    /// Current connection state.
    pub fn current_state(&self) -> ConnectionState {
        *self.inner.connection_state.borrow()
    }

    /// Subscribe to the loading flag.
    pub fn loading(&self) -> watch::Receiver<bool> {
        self.inner.loading.subscribe()
    }

    /// True while a load cycle is running.
    pub fn is_loading(&self) -> bool {
        *self.inner.loading.borrow()
    }

    /// Subscribe to the most recent load error.
    pub fn last_error(&self) -> watch::Receiver<Option<DirectoryError>> {
        self.inner.last_error.subscribe()
    }

    /// Most recent load error, if the last cycle failed.
    pub fn current_error(&self) -> Option<DirectoryError> {
        self.inner.last_error.borrow().clone()
    }

    /// Subscribe to the transient progress banner.
    pub fn info_message(&self) -> watch::Receiver<Option<InfoMessage>> {
        self.inner.info_message.subscribe()
    }

    /// Currently published progress banner, if any.
    pub fn current_info(&self) -> Option<InfoMessage> {
        *self.inner.info_message.borrow()
    }

    /// Subscribe to the manual retry counter.
    pub fn attempts(&self) -> watch::Receiver<u32> {
        self.inner.attempts.subscribe()
    }

    /// Number of manual retries so far.
    pub fn attempt_count(&self) -> u32 {
        *self.inner.attempts.borrow()
    }

    /// The published user store.
    pub fn store(&self) -> &UserStore {
        &self.inner.store
    }

    /// The configuration this directory was built from.
    pub fn config(&self) -> &DirectoryConfig {
        &self.inner.config
    }

    // ── Internal plumbing ────────────────────────────────────────

    /// Publish a state change, logging only real transitions.
    fn set_state(&self, next: ConnectionState) {
        let changed = self.inner.connection_state.send_if_modified(|state| {
            if *state == next {
                false
            } else {
                *state = next;
                true
            }
        });
        if changed {
            debug!(state = %next, "connection state changed");
        }
    }

    /// Publish a progress banner and supersede any pending clear timer.
    fn publish_info(&self, message: InfoMessage) {
        self.inner.info_generation.fetch_add(1, Ordering::AcqRel);
        self.inner.info_message.send_replace(Some(message));
    }

    /// Arrange for the current banner to clear after the configured TTL.
    ///
    /// The timer captures the banner generation; if a newer banner has
    /// been published by the time it fires, the clear is dropped.
    fn schedule_info_clear(&self) {
        let ttl = self.inner.config.info_message_ttl;
        if ttl.is_zero() {
            return;
        }

        let generation = self.inner.info_generation.load(Ordering::Acquire);
        let inner = Arc::clone(&self.inner);
        let cancel = self.inner.cancel.child_token();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {}
                () = tokio::time::sleep(ttl) => {
                    if inner.info_generation.load(Ordering::Acquire) == generation {
                        inner.info_message.send_replace(None);
                    }
                }
            }
        });
    }

    /// Spawn the passive reconnection task exactly once.
    ///
    /// A zero `reconnect_interval` disables passive reconnection.
    async fn ensure_reconnect_task(&self) {
        if self.inner.config.reconnect_interval.is_zero() {
            return;
        }
        if self
            .inner
            .reconnect_spawned
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let period = self.inner.config.reconnect_interval;
        let cancel = self.inner.cancel.child_token();
        let handle = tokio::spawn(reconnect_task(self.clone(), period, cancel));
        self.inner.task_handles.lock().await.push(handle);
        debug!(period = ?period, "passive reconnection task spawned");
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Passive reconnection prober.
///
/// Sleeps until the published state becomes `Disconnected`, then probes
/// the endpoint once per `period` until the state leaves `Disconnected`
/// for good. Probe-only: a successful probe flips the state to
/// `Connected` but never reloads data on its own.
///
/// Returns a boxed future: the task transitively awaits
/// [`Directory::probe`], which re-enters the spawn site, so the future
/// type must be erased to keep the `Send` proof from cycling.
fn reconnect_task(
    directory: Directory,
    period: Duration,
    cancel: CancellationToken,
) -> Pin<Box<dyn Future<Output = ()> + Send>> {
    Box::pin(async move {
        let mut state_rx = directory.inner.connection_state.subscribe();

        loop {
            // Wait out Connected/Checking stretches without a timer running.
            while *state_rx.borrow_and_update() != ConnectionState::Disconnected {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return,
                    changed = state_rx.changed() => {
                        if changed.is_err() {
                            return;
                        }
                    }
                }
            }

            debug!("disconnected -- passive reconnection armed");
            let mut interval = tokio::time::interval(period);
            interval.tick().await; // consume the immediate first tick

            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return,
                    changed = state_rx.changed() => {
                        if changed.is_err() {
                            return;
                        }
                        // A probe of our own lands back in Disconnected and
                        // keeps the timer; any other transition (recovery,
                        // manual load elsewhere) ends the episode.
                        if *state_rx.borrow_and_update() != ConnectionState::Disconnected {
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        debug!("passive reconnection probe");
                        directory.probe().await;
                    }
                }
            }
        }
    })
}
