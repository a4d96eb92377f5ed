//! Asynchronous worker pool for lookups.
//!
//! [`WorkerPool`] owns the sending halves of every worker's request channel.
//! A request goes to the first idle worker found from the round-robin
//! position; when every worker is busy the dispatcher waits until one of them
//! finishes. Shutdown is coordinated through a shared [`CancellationToken`].
//!
//! Busy state lives in [`WorkerSlots`]. A worker's slot is claimed by the
//! dispatcher before the request is queued and released by the worker once
//! the lookup has ended, so a worker never holds more than one lookup.

use crate::{error::ServiceError, service::streaming::request::WorkRequest, telemetry::ServiceStats};
use core::{pin::pin, time::Duration};
use portable_atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::{
    sync::{
        Notify,
        mpsc::{self, error::TrySendError},
        oneshot,
    },
    time::{sleep, timeout},
};
use tokio_util::sync::CancellationToken;

/// How long each worker gets to acknowledge a shutdown request.
const SHUTDOWN_ACK_TIMEOUT: Duration = Duration::from_secs(3);

/// Per-worker busy flags shared by the pool and its workers.
#[derive(Debug)]
pub struct WorkerSlots {
    busy: Vec<AtomicBool>,
    idle: Notify,
}

impl WorkerSlots {
    pub fn new(workers: usize) -> Self {
        Self {
            busy: (0..workers).map(|_| AtomicBool::new(false)).collect(),
            idle: Notify::new(),
        }
    }

    /// Marks `worker` busy. Returns `false` if it already was.
    pub fn try_claim(&self, worker: usize) -> bool {
        self.busy[worker]
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Marks `worker` idle and wakes every dispatcher waiting for one.
    pub fn release(&self, worker: usize) {
        self.busy[worker].store(false, Ordering::Release);
        self.idle.notify_waiters();
    }

    pub fn is_busy(&self, worker: usize) -> bool {
        self.busy[worker].load(Ordering::Acquire)
    }
}

/// A cooperative pool of asynchronous workers that process [`WorkRequest`]s.
pub struct WorkerPool {
    workers: Vec<mpsc::Sender<WorkRequest>>,
    slots: Arc<WorkerSlots>,
    next_worker: AtomicUsize,
    shutting_down: AtomicBool,
    shutdown_token: CancellationToken,
    shutdown_timeout: Duration,
    stats: Arc<ServiceStats>,
}

impl WorkerPool {
    /// Constructs a new [`WorkerPool`] from initialized worker channels, the
    /// slots those workers release and a shared cancellation token.
    pub const fn new(
        workers: Vec<mpsc::Sender<WorkRequest>>,
        slots: Arc<WorkerSlots>,
        shutdown_token: CancellationToken,
        shutdown_timeout: Duration,
        stats: Arc<ServiceStats>,
    ) -> Self {
        Self {
            workers,
            slots,
            next_worker: AtomicUsize::new(0),
            shutting_down: AtomicBool::new(false),
            shutdown_token,
            shutdown_timeout,
            stats,
        }
    }

    /// The token every lookup's own token is derived from.
    pub const fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::Acquire)
    }

    /// Returns the index of the next worker to receive work (round-robin).
    pub fn next_worker_index(&self) -> usize {
        self.next_worker.fetch_add(1, Ordering::Relaxed) % self.workers.len()
    }

    /// Sends a [`WorkRequest`] to an idle worker.
    ///
    /// Starting at the round-robin position, the first worker whose slot can
    /// be claimed takes the request. If every worker is busy, waits until any
    /// worker releases its slot and tries again.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The service is shutting down, before or while waiting.
    /// - The chosen worker's channel is closed.
    pub async fn send_to_next_worker(&self, request: WorkRequest) -> Result<(), ServiceError> {
        if self.is_shutting_down() || self.shutdown_token.is_cancelled() {
            return Err(ServiceError::ServiceShutdown);
        }

        let start = self.next_worker_index();

        loop {
            // Registered before scanning so a release in between is not lost.
            let mut idle = pin!(self.slots.idle.notified());
            idle.as_mut().enable();

            for offset in 0..self.workers.len() {
                let worker_idx = (start + offset) % self.workers.len();
                if !self.slots.try_claim(worker_idx) {
                    continue;
                }

                return match self.workers[worker_idx].try_send(request) {
                    Ok(()) => Ok(()),
                    // An idle worker's queue only fills with a shutdown notice.
                    Err(TrySendError::Full(_)) => {
                        self.slots.release(worker_idx);
                        Err(ServiceError::ServiceShutdown)
                    }
                    Err(TrySendError::Closed(_)) => {
                        self.slots.release(worker_idx);
                        Err(ServiceError::ChannelError {
                            context: format!("Worker {worker_idx} channel closed"),
                        })
                    }
                };
            }

            #[cfg(feature = "tracing")]
            tracing::trace!("All {} workers busy, waiting for one to finish", self.workers.len());

            tokio::select! {
                () = self.shutdown_token.cancelled() => return Err(ServiceError::ServiceShutdown),
                () = idle => {}
            }
        }
    }

    /// Gracefully shuts down all workers in the pool.
    ///
    /// - Refuses new lookups.
    /// - Waits up to `shutdown_timeout` for in-flight lookups to finish.
    /// - Cancels the shared [`CancellationToken`] to stop whatever remains.
    /// - Sends a [`WorkRequest::Shutdown`] to each worker and waits (up to 3
    ///   seconds per worker) for acknowledgements.
    ///
    /// Calling it again after the first shutdown is a no-op.
    pub async fn shutdown(&self) -> Result<(), ServiceError> {
        // === Phase 0: Stop accepting new requests ===
        if self.shutting_down.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        #[cfg(feature = "tracing")]
        tracing::info!("Refusing new lookups");

        // === Phase 1: Wait for in-flight lookups to drain ===
        #[cfg(feature = "tracing")]
        tracing::info!(
            "Draining in-flight lookups ({} active)",
            self.stats.inflight()
        );
        let drain_result = timeout(self.shutdown_timeout, async {
            while self.stats.inflight() > 0 {
                sleep(Duration::from_millis(50)).await;
            }
        })
        .await;

        match drain_result {
            Ok(()) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("All in-flight lookups drained");
            }
            Err(_) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    "Graceful drain timed out ({} lookups still active)",
                    self.stats.inflight()
                );
            }
        }

        // === Phase 2: Cancel any remaining work ===
        #[cfg(feature = "tracing")]
        tracing::debug!("Cancelling remaining work via shutdown token");
        self.shutdown_token.cancel();

        // === Phase 3: Notify workers to shut down ===
        let mut shutdown_handles = Vec::with_capacity(self.workers.len());

        for (i, worker) in self.workers.iter().enumerate() {
            let (tx, rx) = oneshot::channel();
            if let Err(_e) = worker.send(WorkRequest::Shutdown { response: tx }).await {
                #[cfg(feature = "tracing")]
                tracing::error!("Failed to send shutdown to worker {i}");
            } else {
                shutdown_handles.push((i, rx));
            }
        }

        let ack_futures = shutdown_handles.into_iter().map(|(_i, rx)| async move {
            match timeout(SHUTDOWN_ACK_TIMEOUT, rx).await {
                Ok(Ok(())) => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!("Worker {_i} shutdown acknowledged");
                }
                Ok(Err(_e)) => {
                    #[cfg(feature = "tracing")]
                    tracing::error!("Worker {_i} dropped its acknowledgement: {_e}");
                }
                Err(_) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("Worker {_i} shutdown timed out");
                }
            }
        });

        futures::future::join_all(ack_futures).await;

        #[cfg(feature = "tracing")]
        tracing::info!("Worker pool shutdown complete: {:?}", self.stats.snapshot());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_slot_is_claimed_once_until_released() {
        let slots = WorkerSlots::new(2);

        assert!(slots.try_claim(1));
        assert!(slots.is_busy(1));
        assert!(!slots.try_claim(1));
        assert!(!slots.is_busy(0));

        slots.release(1);
        assert!(!slots.is_busy(1));
        assert!(slots.try_claim(1));
    }

    #[tokio::test]
    async fn release_wakes_a_registered_waiter() {
        let slots = WorkerSlots::new(1);
        assert!(slots.try_claim(0));

        let mut idle = pin!(slots.idle.notified());
        idle.as_mut().enable();
        slots.release(0);

        timeout(Duration::from_secs(1), idle)
            .await
            .expect("release did not wake the waiter");
    }
}
