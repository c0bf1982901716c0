use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::kube::{ClusterId, FetchError, GraphSnapshot, ResourceSource};

use super::Repaint;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FetchOrigin {
    Foreground,
    Background,
}

struct SnapshotUpdate {
    session: u64,
    request: u64,
    origin: FetchOrigin,
    result: Result<GraphSnapshot, FetchError>,
}

/// Owns the cluster snapshot and keeps it fresh.
///
/// A foreground fetch runs on `start` and on explicit reloads and is the
/// only thing that toggles `loading`. A background poll runs every
/// `interval` for as long as the coordinator is started. Every request
/// takes a sequence number when it is issued; a result older than the
/// newest applied one is dropped.
pub struct RefreshCoordinator {
    source: Arc<dyn ResourceSource>,
    runtime: Handle,
    interval: Duration,
    repaint: Repaint,
    cluster: Option<ClusterId>,
    snapshot: Option<Arc<GraphSnapshot>>,
    revision: u64,
    refreshed_at: Option<DateTime<Local>>,
    loading: bool,
    error: Option<String>,
    session: u64,
    requests: Arc<AtomicU64>,
    pending_foreground: Option<u64>,
    newest_applied: u64,
    poll_task: Option<JoinHandle<()>>,
    foreground_task: Option<JoinHandle<()>>,
    tx: UnboundedSender<SnapshotUpdate>,
    rx: UnboundedReceiver<SnapshotUpdate>,
}

impl RefreshCoordinator {
    pub fn new(
        source: Arc<dyn ResourceSource>,
        runtime: Handle,
        interval: Duration,
        repaint: Repaint,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            runtime,
            interval,
            repaint,
            cluster: None,
            snapshot: None,
            revision: 0,
            refreshed_at: None,
            loading: false,
            error: None,
            session: 0,
            requests: Arc::new(AtomicU64::new(0)),
            pending_foreground: None,
            newest_applied: 0,
            poll_task: None,
            foreground_task: None,
            tx,
            rx,
        }
    }

    pub fn start(&mut self, cluster: ClusterId) {
        self.stop();
        tracing::info!(%cluster, interval = ?self.interval, "starting topology refresh");

        self.cluster = Some(cluster.clone());
        self.snapshot = None;
        self.refreshed_at = None;
        self.error = None;
        self.newest_applied = 0;
        self.revision += 1;

        self.spawn_foreground(cluster.clone());
        self.spawn_poll(cluster);
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }
        if let Some(task) = self.foreground_task.take() {
            task.abort();
        }
        if let Some(cluster) = self.cluster.take() {
            tracing::info!(%cluster, "stopped topology refresh");
        }

        self.session += 1;
        self.pending_foreground = None;
        self.loading = false;
    }

    /// Foreground refetch for the current cluster. Ignored while one is
    /// already in flight.
    pub fn reload(&mut self) {
        if self.loading {
            return;
        }
        let Some(cluster) = self.cluster.clone() else {
            return;
        };

        self.error = None;
        self.spawn_foreground(cluster);
    }

    pub fn snapshot(&self) -> Option<&Arc<GraphSnapshot>> {
        self.snapshot.as_ref()
    }

    /// Moves whenever the stored snapshot is replaced or cleared.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Local>> {
        self.refreshed_at
    }

    /// Applies every result that arrived since the last call. Returns true
    /// when the snapshot or the loading/error state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(update) = self.rx.try_recv() {
            changed |= self.apply(update);
        }
        changed
    }

    fn apply(&mut self, update: SnapshotUpdate) -> bool {
        if update.session != self.session {
            tracing::debug!(request = update.request, "dropping result from a stopped session");
            return false;
        }

        let mut changed = false;
        let foreground = update.origin == FetchOrigin::Foreground;
        if foreground && self.pending_foreground == Some(update.request) {
            self.pending_foreground = None;
            self.foreground_task = None;
            self.loading = false;
            changed = true;
        }

        match update.result {
            Ok(snapshot) => {
                if update.request < self.newest_applied {
                    tracing::debug!(
                        request = update.request,
                        newest = self.newest_applied,
                        "dropping superseded snapshot"
                    );
                    return changed;
                }

                if foreground {
                    tracing::info!(
                        nodes = snapshot.node_count(),
                        edges = snapshot.edge_count(),
                        "topology loaded"
                    );
                } else {
                    tracing::debug!(nodes = snapshot.node_count(), "topology refreshed");
                }

                self.newest_applied = update.request;
                self.snapshot = Some(Arc::new(snapshot));
                self.refreshed_at = Some(Local::now());
                self.revision += 1;
                true
            }
            Err(error) if foreground && update.request < self.newest_applied => {
                tracing::debug!(
                    %error,
                    request = update.request,
                    newest = self.newest_applied,
                    "ignoring failure superseded by a newer snapshot"
                );
                changed
            }
            Err(error) if foreground => {
                tracing::error!(%error, "failed to load topology");
                self.error = Some(format!("Failed to load topology: {error}"));
                true
            }
            Err(error) => {
                tracing::warn!(%error, "background topology refresh failed, keeping previous snapshot");
                changed
            }
        }
    }

    fn next_request(&self) -> u64 {
        self.requests.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn spawn_foreground(&mut self, cluster: ClusterId) {
        let request = self.next_request();
        self.pending_foreground = Some(request);
        self.loading = true;

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let repaint = Arc::clone(&self.repaint);
        let session = self.session;

        self.foreground_task = Some(self.runtime.spawn(async move {
            let result = source.fetch_topology(&cluster).await;
            let update = SnapshotUpdate {
                session,
                request,
                origin: FetchOrigin::Foreground,
                result,
            };
            if tx.send(update).is_ok() {
                repaint();
            }
        }));
    }

    fn spawn_poll(&mut self, cluster: ClusterId) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let repaint = Arc::clone(&self.repaint);
        let requests = Arc::clone(&self.requests);
        let session = self.session;
        let interval = self.interval;

        self.poll_task = Some(self.runtime.spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let request = requests.fetch_add(1, Ordering::Relaxed) + 1;
                let result = source.fetch_topology(&cluster).await;
                let update = SnapshotUpdate {
                    session,
                    request,
                    origin: FetchOrigin::Background,
                    result,
                };
                if tx.send(update).is_err() {
                    break;
                }
                repaint();
            }
        }));
    }
}

impl Drop for RefreshCoordinator {
    fn drop(&mut self) {
        self.stop();
    }
}
