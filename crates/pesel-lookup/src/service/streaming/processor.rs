use crate::{error::ServiceError, service::handler::Reply, telemetry::ServiceStats};
use pesel::DecodedPesel;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Runs one lookup inside a worker and streams its results.
///
/// Decoded identifiers are collected into batches of `results_per_batch` and
/// sent through `reply_tx` in the order the engine produces them. A trailing
/// partial batch is flushed, then exactly one [`Reply::Complete`] carries the
/// total. An engine error is sent as the only item instead.
///
/// # Arguments
///
/// - `_worker_id`: Identifier for this worker, used in logs and tracing.
/// - `results`: The engine's result iterator for this lookup.
/// - `results_per_batch`: Maximum number of identifiers per [`Reply::Batch`].
/// - `reply_tx`: Channel back to the caller's [`crate::Lookup`] stream.
/// - `cancel`: Token cancelled by the caller or by service shutdown.
/// - `stats`: Service counters.
///
/// # Behavior
///
/// - Checks `cancel` before every item and before every send, and exits
///   without sending anything further once it fires.
/// - Exits early if the caller dropped the receiving side.
/// - Yields to the scheduler after each batch so long sweeps share the
///   runtime with other workers.
#[allow(clippy::used_underscore_binding)]
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip_all, fields(worker = _worker_id))
)]
pub async fn handle_lookup<I>(
    _worker_id: usize,
    results: I,
    results_per_batch: usize,
    reply_tx: mpsc::Sender<Result<Reply, ServiceError>>,
    cancel: CancellationToken,
    stats: &ServiceStats,
) where
    I: Iterator<Item = pesel::Result<DecodedPesel>>,
{
    let mut batch = Vec::with_capacity(results_per_batch);
    let mut total = 0;

    for item in results {
        if cancel.is_cancelled() {
            #[cfg(feature = "tracing")]
            tracing::debug!("Worker {_worker_id} abandoning cancelled lookup after {total} results");
            return;
        }

        match item {
            Ok(decoded) => {
                batch.push(decoded);
                if batch.len() == results_per_batch {
                    let full =
                        core::mem::replace(&mut batch, Vec::with_capacity(results_per_batch));
                    let count = full.len();
                    if !send(_worker_id, &reply_tx, &cancel, Ok(Reply::Batch(full))).await {
                        return;
                    }
                    total += count;
                    stats.record_results(count as u64);
                    tokio::task::yield_now().await;
                }
            }
            Err(e) => {
                stats.record_error();
                send(_worker_id, &reply_tx, &cancel, Err(e.into())).await;
                return;
            }
        }
    }

    if !batch.is_empty() {
        let count = batch.len();
        if !send(_worker_id, &reply_tx, &cancel, Ok(Reply::Batch(batch))).await {
            return;
        }
        total += count;
        stats.record_results(count as u64);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!("Worker {_worker_id} completed lookup with {total} results");

    send(_worker_id, &reply_tx, &cancel, Ok(Reply::Complete { total })).await;
}

/// Sends one reply unless the caller is gone or the lookup was cancelled.
///
/// Returns `false` when the worker should stop.
#[allow(clippy::used_underscore_binding)]
async fn send(
    _worker_id: usize,
    reply_tx: &mpsc::Sender<Result<Reply, ServiceError>>,
    cancel: &CancellationToken,
    reply: Result<Reply, ServiceError>,
) -> bool {
    if reply_tx.is_closed() {
        #[cfg(feature = "tracing")]
        tracing::debug!("Worker {_worker_id} exiting, caller dropped the lookup");
        return false;
    }

    // A caller that cancels without draining must not leave the worker parked
    // on a full channel.
    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            #[cfg(feature = "tracing")]
            tracing::debug!("Worker {_worker_id} cancelled while sending");
            false
        }
        res = reply_tx.send(reply) => match res {
            Ok(()) => true,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Worker {_worker_id} failed to send reply: {_e}");
                false
            }
        },
    }
}
