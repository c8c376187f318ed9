// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-ticket background work queue.
//!
//! Each ticket with pending work gets its own worker task fed by an
//! unbounded channel. Jobs for one ticket run strictly in submission order;
//! jobs for different tickets run concurrently. A worker deregisters itself
//! once its channel is empty, and the emptiness check happens under the
//! map's shard lock, so a submission either reaches the live worker or
//! finds the slot vacant and starts a new one.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use supportdesk_core::DeskError;

struct QueuedJob {
    label: &'static str,
    job: BoxFuture<'static, Result<(), DeskError>>,
}

struct QueueInner {
    workers: DashMap<String, mpsc::UnboundedSender<QueuedJob>>,
    tracker: TaskTracker,
}

/// Serializes background jobs per ticket id without blocking submitters.
#[derive(Clone)]
pub struct TicketWorkQueue {
    inner: Arc<QueueInner>,
}

impl std::fmt::Debug for TicketWorkQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketWorkQueue")
            .field("active_tickets", &self.inner.workers.len())
            .finish()
    }
}

impl Default for TicketWorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketWorkQueue {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(QueueInner {
                workers: DashMap::new(),
                tracker: TaskTracker::new(),
            }),
        }
    }

    /// Enqueues `job` behind any pending work for `ticket_id`.
    ///
    /// Must be called from within a Tokio runtime. Errors returned by the
    /// job are logged with `label` and discarded.
    pub fn submit<F>(&self, ticket_id: &str, label: &'static str, job: F)
    where
        F: Future<Output = Result<(), DeskError>> + Send + 'static,
    {
        let queued = QueuedJob {
            label,
            job: Box::pin(job),
        };

        match self.inner.workers.entry(ticket_id.to_string()) {
            Entry::Occupied(mut slot) => {
                if let Err(mpsc::error::SendError(queued)) = slot.get().send(queued) {
                    // Worker died without deregistering; replace it.
                    let tx = self.spawn_worker(ticket_id, queued);
                    slot.insert(tx);
                }
            }
            Entry::Vacant(slot) => {
                let tx = self.spawn_worker(ticket_id, queued);
                slot.insert(tx);
            }
        }
        debug!(ticket_id, job = label, "background job queued");
    }

    fn spawn_worker(&self, ticket_id: &str, first: QueuedJob) -> mpsc::UnboundedSender<QueuedJob> {
        let (tx, rx) = mpsc::unbounded_channel();
        // Cannot fail: the receiver is alive.
        let _ = tx.send(first);
        self.inner
            .tracker
            .spawn(run_worker(self.inner.clone(), ticket_id.to_string(), rx));
        tx
    }

    /// Number of tickets that currently have a live worker.
    pub fn active_tickets(&self) -> usize {
        self.inner.workers.len()
    }

    /// Waits until every submitted job has finished.
    pub async fn wait_idle(&self) {
        self.inner.tracker.close();
        self.inner.tracker.wait().await;
        self.inner.tracker.reopen();
    }

    /// Waits up to `timeout` for pending jobs. Returns `true` if the queue drained.
    ///
    /// Running jobs are never cancelled; on timeout they are abandoned to the
    /// runtime's own shutdown.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        let pending = self.inner.workers.len();
        if pending == 0 && self.inner.tracker.is_empty() {
            info!("no background jobs to drain");
            return true;
        }

        info!(tickets = pending, "draining background jobs");
        self.inner.tracker.close();
        let drained = tokio::time::timeout(timeout, self.inner.tracker.wait())
            .await
            .is_ok();
        if drained {
            info!("background jobs drained");
        } else {
            warn!(
                remaining = self.inner.workers.len(),
                "drain timeout reached, abandoning background jobs"
            );
        }
        drained
    }
}

async fn run_worker(
    inner: Arc<QueueInner>,
    ticket_id: String,
    mut rx: mpsc::UnboundedReceiver<QueuedJob>,
) {
    loop {
        let queued = match rx.try_recv() {
            Ok(queued) => queued,
            Err(TryRecvError::Empty) => {
                let removed = inner
                    .workers
                    .remove_if(&ticket_id, |_, _| rx.is_empty())
                    .is_some();
                if removed || !inner.workers.contains_key(&ticket_id) {
                    break;
                }
                // A job arrived between try_recv and the removal check.
                continue;
            }
            Err(TryRecvError::Disconnected) => break,
        };

        let label = queued.label;
        match AssertUnwindSafe(queued.job).catch_unwind().await {
            Ok(Ok(())) => debug!(ticket_id = %ticket_id, job = label, "background job finished"),
            Ok(Err(e)) => warn!(
                ticket_id = %ticket_id,
                job = label,
                error = %e,
                "background job failed"
            ),
            Err(_) => error!(ticket_id = %ticket_id, job = label, "background job panicked"),
        }
    }
}
