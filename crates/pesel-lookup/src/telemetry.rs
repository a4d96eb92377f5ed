//! Logging setup and service counters.
//!
//! Log output always goes through `tracing_subscriber::fmt` on stderr, so
//! stdout stays reserved for results. The filter comes from `RUST_LOG` and
//! defaults to `warn`, which keeps interactive runs quiet.
//!
//! ```bash
//! RUST_LOG=debug pesel-lookup search 01458
//! ```
//!
//! Counters live in [`ServiceStats`], one instance per service, and are
//! logged when the service shuts down.

use portable_atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global `tracing` subscriber.
///
/// # Errors
///
/// Fails if a global subscriber was already installed.
pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_ids(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339()),
        )
        .try_init()?;

    Ok(())
}

/// Request, result and error counters shared by the service and its workers.
#[derive(Debug, Default)]
pub struct ServiceStats {
    requests: AtomicU64,
    results: AtomicU64,
    errors: AtomicU64,
    inflight: AtomicUsize,
}

/// Point-in-time copy of [`ServiceStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Lookups accepted for dispatch.
    pub requests: u64,
    /// Decoded identifiers handed to callers.
    pub results: u64,
    /// Lookups that ended in an error.
    pub errors: u64,
    /// Lookups currently owned by a worker or waiting for one.
    pub inflight: usize,
}

impl ServiceStats {
    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_results(&self, count: u64) {
        self.results.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inflight(&self) -> usize {
        self.inflight.load(Ordering::Acquire)
    }

    /// Marks one lookup as in flight until the returned guard is dropped.
    pub fn track(self: &Arc<Self>) -> InflightGuard {
        self.inflight.fetch_add(1, Ordering::AcqRel);
        InflightGuard {
            stats: Arc::clone(self),
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            results: self.results.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            inflight: self.inflight(),
        }
    }
}

/// Decrements the in-flight count on drop, wherever the lookup ends.
#[derive(Debug)]
pub struct InflightGuard {
    stats: Arc<ServiceStats>,
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        self.stats.inflight.fetch_sub(1, Ordering::AcqRel);
    }
}
