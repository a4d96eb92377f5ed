//! Lookup service: the caller-facing side of the worker pool.
//!
//! [`LookupService`] spawns the workers and hands out [`Lookup`] streams. A
//! lookup never blocks the caller's task: the engine runs on a worker and
//! results arrive as [`Reply`] batches through a bounded channel, so a slow
//! reader applies backpressure to the worker that serves it.
//!
//! ## Responsibilities
//!
//! - Spawn and own the [`WorkerPool`].
//! - Give every lookup its own cancellation token, derived from the service
//!   shutdown token.
//! - Track requests, results, errors and in-flight lookups in
//!   [`ServiceStats`].

use crate::{
    config::ServiceConfig,
    error::ServiceError,
    service::{
        pool::{
            manager::{WorkerPool, WorkerSlots},
            worker::worker_loop,
        },
        streaming::request::{Job, WorkRequest},
    },
    telemetry::{ServiceStats, StatsSnapshot},
};
use core::{
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};
use pesel::{CalendarDate, DecodedPesel, Fragment, SearchRequest};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::{Stream, StreamExt, wrappers::ReceiverStream};
use tokio_util::sync::{CancellationToken, DropGuard};

/// One message on a [`Lookup`] stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// Up to `results_per_batch` decoded identifiers, in engine order.
    Batch(Vec<DecodedPesel>),
    /// The lookup finished; `total` identifiers were sent. Always last.
    Complete { total: usize },
}

/// Everything a finished lookup produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub results: Vec<DecodedPesel>,
    pub total: usize,
}

impl Outcome {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Streaming handle for one in-flight lookup.
///
/// Yields `Ok(Reply::Batch(..))` items followed by one `Ok(Reply::Complete)`,
/// or a single `Err` on failure. Dropping the handle cancels the lookup.
pub struct Lookup {
    replies: ReceiverStream<Result<Reply, ServiceError>>,
    cancel: CancellationToken,
    _guard: DropGuard,
}

impl Lookup {
    fn new(rx: mpsc::Receiver<Result<Reply, ServiceError>>, cancel: CancellationToken) -> Self {
        Self {
            replies: ReceiverStream::new(rx),
            _guard: cancel.clone().drop_guard(),
            cancel,
        }
    }

    /// Asks the worker to stop. Results already buffered can still be read;
    /// no completion signal follows.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Drains the stream.
    ///
    /// # Errors
    ///
    /// The error the worker reported, or [`ServiceError::RequestCancelled`]
    /// if the stream ended without a completion signal.
    pub async fn collect(mut self) -> Result<Outcome, ServiceError> {
        let mut results = Vec::new();
        while let Some(reply) = self.replies.next().await {
            match reply? {
                Reply::Batch(batch) => results.extend(batch),
                Reply::Complete { total } => return Ok(Outcome { results, total }),
            }
        }
        Err(ServiceError::RequestCancelled)
    }
}

impl Stream for Lookup {
    type Item = Result<Reply, ServiceError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().replies).poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.replies.size_hint()
    }
}

/// Dispatcher that runs lookups on a pool of background workers.
///
/// Cloning is cheap; clones share the same workers.
#[derive(Clone)]
pub struct LookupService {
    config: ServiceConfig,
    worker_pool: Arc<WorkerPool>,
    stats: Arc<ServiceStats>,
}

impl LookupService {
    /// Creates a new `LookupService` and spawns its worker tasks.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// [`ServiceError::InvalidConfig`] if any worker count or buffer size in
    /// `config` is zero.
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        config.validate()?;

        let stats = Arc::new(ServiceStats::default());
        let slots = Arc::new(WorkerSlots::new(config.num_workers));
        let shutdown_token = CancellationToken::new();
        let mut workers = Vec::with_capacity(config.num_workers);

        for worker_id in 0..config.num_workers {
            // One queued request per worker. Dispatch only targets workers
            // whose slot is free, so the queue never holds a second lookup.
            let (tx, rx) = mpsc::channel(1);
            workers.push(tx);

            tokio::spawn(worker_loop(
                worker_id,
                rx,
                config.results_per_batch,
                Arc::clone(&slots),
                Arc::clone(&stats),
            ));
        }

        let worker_pool = WorkerPool::new(
            workers,
            slots,
            shutdown_token,
            Duration::from_secs(config.shutdown_timeout),
            Arc::clone(&stats),
        );

        #[cfg(feature = "tracing")]
        tracing::debug!("Lookup service started with {} workers", config.num_workers);

        Ok(Self {
            config,
            worker_pool: Arc::new(worker_pool),
            stats,
        })
    }

    /// Dispatches one of the engine's lookups.
    ///
    /// # Errors
    ///
    /// [`ServiceError::ServiceShutdown`] once [`Self::shutdown`] has started,
    /// or [`ServiceError::ChannelError`] if a worker has gone away. When every
    /// worker is busy, waits for one to become free.
    pub async fn lookup(&self, request: SearchRequest) -> Result<Lookup, ServiceError> {
        self.submit(Job::Request(request)).await
    }

    /// Dispatches a fragment sweep over the inclusive window `from..=to`.
    ///
    /// # Errors
    ///
    /// [`ServiceError::InvalidRequest`] if `from` is after `to`, otherwise as
    /// [`Self::lookup`].
    pub async fn lookup_within(
        &self,
        fragment: Fragment,
        from: CalendarDate,
        to: CalendarDate,
    ) -> Result<Lookup, ServiceError> {
        self.submit(Job::FragmentWithin { fragment, from, to }).await
    }

    /// Dispatches any [`Job`].
    ///
    /// # Errors
    ///
    /// As [`Self::lookup`] and [`Self::lookup_within`].
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self), fields(kind = job.kind())))]
    pub async fn submit(&self, job: Job) -> Result<Lookup, ServiceError> {
        if self.worker_pool.is_shutting_down() {
            return Err(ServiceError::ServiceShutdown);
        }

        if let Job::FragmentWithin { from, to, .. } = job {
            if from > to {
                self.stats.record_error();
                return Err(ServiceError::InvalidRequest {
                    reason: format!("window start {from} is after window end {to}"),
                });
            }
        }

        self.stats.record_request();

        let (reply_tx, reply_rx) = mpsc::channel(self.config.stream_buffer_size);
        let cancel = self.worker_pool.shutdown_token().child_token();

        let work = WorkRequest::Lookup {
            job,
            reply_tx,
            cancel: cancel.clone(),
            inflight: self.stats.track(),
        };

        if let Err(e) = self.worker_pool.send_to_next_worker(work).await {
            self.stats.record_error();
            #[cfg(feature = "tracing")]
            tracing::warn!("Failed to dispatch {job}: {e}");
            return Err(e);
        }

        Ok(Lookup::new(reply_rx, cancel))
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Initiates a graceful shutdown of the worker pool.
    ///
    /// Lookups still running after the configured timeout are cancelled, and
    /// the call returns once each worker acknowledges termination.
    pub async fn shutdown(&self) -> Result<(), ServiceError> {
        self.worker_pool.shutdown().await
    }
}
