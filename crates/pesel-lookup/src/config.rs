use crate::error::ServiceError;
use clap::Args;

pub const DEFAULT_RESULTS_PER_BATCH: usize = 512;
pub const DEFAULT_STREAM_BUFFER_SIZE: usize = 8;
pub const DEFAULT_SHUTDOWN_TIMEOUT: u64 = 3;

/// Tuning knobs for the lookup service.
///
/// All values are parsed from CLI arguments or environment variables (a `.env`
/// file in the working directory is honoured), with defaults suitable for an
/// interactive terminal.
#[derive(Args, Debug, Clone)]
pub struct ServiceArgs {
    /// Number of worker tasks answering lookups concurrently.
    ///
    /// Each worker handles one lookup at a time from start to finish.
    /// Defaults to the number of logical CPUs.
    ///
    /// Environment variable: `PESEL_NUM_WORKERS`
    #[arg(long, env = "PESEL_NUM_WORKERS", default_value_t = num_cpus::get())]
    pub num_workers: usize,

    /// Maximum number of decoded identifiers in each streamed batch.
    ///
    /// Smaller batches reach the caller sooner; larger batches cost fewer
    /// channel round trips.
    ///
    /// Environment variable: `PESEL_RESULTS_PER_BATCH`
    #[arg(long, env = "PESEL_RESULTS_PER_BATCH", default_value_t = DEFAULT_RESULTS_PER_BATCH)]
    pub results_per_batch: usize,

    /// Capacity of the reply buffer between a worker and its caller.
    ///
    /// This is how many batches a worker may run ahead of a slow reader
    /// before it waits.
    ///
    /// Environment variable: `PESEL_STREAM_BUFFER_SIZE`
    #[arg(long, env = "PESEL_STREAM_BUFFER_SIZE", default_value_t = DEFAULT_STREAM_BUFFER_SIZE)]
    pub stream_buffer_size: usize,

    /// Seconds to wait for in-flight lookups to finish on shutdown before
    /// cancelling them.
    ///
    /// Environment variable: `PESEL_SHUTDOWN_TIMEOUT`
    #[arg(long, env = "PESEL_SHUTDOWN_TIMEOUT", default_value_t = DEFAULT_SHUTDOWN_TIMEOUT)]
    pub shutdown_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub num_workers: usize,
    pub results_per_batch: usize,
    pub stream_buffer_size: usize,
    pub shutdown_timeout: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
            results_per_batch: DEFAULT_RESULTS_PER_BATCH,
            stream_buffer_size: DEFAULT_STREAM_BUFFER_SIZE,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

impl ServiceConfig {
    /// Checks that every count and size is non-zero.
    ///
    /// # Errors
    ///
    /// [`ServiceError::InvalidConfig`] naming the offending setting.
    pub fn validate(&self) -> Result<(), ServiceError> {
        let invalid = |setting: &str| -> Result<(), ServiceError> {
            Err(ServiceError::InvalidConfig {
                reason: format!("{setting} must be greater than 0"),
            })
        };

        if self.num_workers == 0 {
            return invalid("PESEL_NUM_WORKERS");
        }

        if self.results_per_batch == 0 {
            return invalid("PESEL_RESULTS_PER_BATCH");
        }

        // `tokio::sync::mpsc::channel` panics on a zero capacity.
        if self.stream_buffer_size == 0 {
            return invalid("PESEL_STREAM_BUFFER_SIZE");
        }

        Ok(())
    }
}

impl TryFrom<ServiceArgs> for ServiceConfig {
    type Error = anyhow::Error;

    fn try_from(args: ServiceArgs) -> Result<Self, Self::Error> {
        let config = Self {
            num_workers: args.num_workers,
            results_per_batch: args.results_per_batch,
            stream_buffer_size: args.stream_buffer_size,
            shutdown_timeout: args.shutdown_timeout,
        };
        config.validate()?;
        Ok(config)
    }
}
