use crate::{
    service::{
        pool::manager::WorkerSlots,
        streaming::{processor::handle_lookup, request::WorkRequest},
    },
    telemetry::ServiceStats,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Worker task responsible for processing [`WorkRequest`] messages.
///
/// The worker listens on an MPSC channel and runs one lookup at a time until a
/// shutdown signal is received. It is spawned as a Tokio task by
/// [`crate::LookupService::new`].
///
/// # Arguments
///
/// - `worker_id`: Unique numeric identifier for this worker (used for
///   logs/tracing).
/// - `rx`: Receiver through which [`WorkRequest`]s are received.
/// - `results_per_batch`: Maximum number of identifiers per streamed batch.
/// - `slots`: Busy flags shared with the pool. This worker's slot is released
///   once each lookup ends.
/// - `stats`: Counters shared with the service.
///
/// # Request Types
///
/// - [`WorkRequest::Lookup`] runs the job via [`handle_lookup`].
/// - [`WorkRequest::Shutdown`] stops the worker after acknowledging.
pub async fn worker_loop(
    worker_id: usize,
    mut rx: mpsc::Receiver<WorkRequest>,
    results_per_batch: usize,
    slots: Arc<WorkerSlots>,
    stats: Arc<ServiceStats>,
) {
    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {worker_id} started");

    while let Some(work) = rx.recv().await {
        match work {
            WorkRequest::Lookup {
                job,
                reply_tx,
                cancel,
                inflight,
            } => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Worker {worker_id} running {job}");

                handle_lookup(
                    worker_id,
                    job.run(),
                    results_per_batch,
                    reply_tx,
                    cancel,
                    &stats,
                )
                .await;
                slots.release(worker_id);
                drop(inflight);
            }
            WorkRequest::Shutdown { response } => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Worker {worker_id} received shutdown signal");

                if response.send(()).is_err() {
                    #[cfg(feature = "tracing")]
                    tracing::error!("Worker {worker_id} failed to acknowledge shutdown");
                }
                break;
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {worker_id} stopped");
}
