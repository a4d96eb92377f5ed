mod cli;

use clap::Parser;
use cli::{CliArgs, Format};
use futures::StreamExt;
use pesel::DecodedPesel;
use pesel_lookup::{
    Job, LookupService, Reply, ServiceConfig, ServiceError, init_telemetry,
};
use std::{
    io::{self, BufWriter, Write},
    process::ExitCode,
};
use tokio::signal;

// Using mimalloc for better performance when many workers allocate result
// batches at once.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Exit status after Ctrl+C or SIGTERM.
const INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    init_telemetry()?;

    let config = ServiceConfig::try_from(args.service)?;
    let job = args.command.into_job()?;
    log_startup_info(&job, &config);

    let service = LookupService::new(config)?;

    // Losing the race drops the in-flight lookup, which cancels it.
    let code = tokio::select! {
        code = run(&service, job, args.format) => code?,
        () = shutdown_signal() => {
            eprintln!("Cancelled");
            ExitCode::from(INTERRUPTED)
        }
    };

    if let Err(_e) = service.shutdown().await {
        #[cfg(feature = "tracing")]
        tracing::error!("Error during service shutdown: {_e}");
    }

    Ok(code)
}

/// Streams one job's results to stdout.
///
/// A completed lookup exits successfully even with zero results; a rejected
/// or interrupted one prints `No result` and fails.
async fn run(service: &LookupService, job: Job, format: Format) -> anyhow::Result<ExitCode> {
    let mut lookup = match service.submit(job).await {
        Ok(lookup) => lookup,
        Err(e) => return Ok(no_result(&e)),
    };

    let mut out = BufWriter::new(io::stdout().lock());

    while let Some(reply) = lookup.next().await {
        match reply {
            Ok(Reply::Batch(batch)) => {
                for decoded in &batch {
                    match write_record(&mut out, decoded, format) {
                        Ok(()) => {}
                        // Downstream closed (e.g. `| head`): stop quietly.
                        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                            return Ok(ExitCode::SUCCESS);
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
            Ok(Reply::Complete { total }) => {
                out.flush()?;
                let noun = if total == 1 { "result" } else { "results" };
                eprintln!("{total} {noun}");
                return Ok(ExitCode::SUCCESS);
            }
            Err(e) => {
                out.flush()?;
                return Ok(no_result(&e));
            }
        }
    }

    out.flush()?;
    Ok(no_result(&ServiceError::RequestCancelled))
}

fn write_record(out: &mut impl Write, decoded: &DecodedPesel, format: Format) -> io::Result<()> {
    match format {
        Format::Text => writeln!(out, "{}  {}  {}", decoded.pesel, decoded.date, decoded.sex),
        Format::Json => {
            serde_json::to_writer(&mut *out, decoded)?;
            writeln!(out)
        }
    }
}

fn no_result(e: &ServiceError) -> ExitCode {
    eprintln!("No result: {e}");
    ExitCode::FAILURE
}

fn log_startup_info(_job: &Job, _config: &ServiceConfig) {
    if cfg!(debug_assertions) {
        #[cfg(feature = "tracing")]
        tracing::info!("Running {} with full config: {:#?}", _job, _config);
    } else {
        #[cfg(feature = "tracing")]
        tracing::info!("Running {} on {} workers", _job, _config.num_workers);
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Failed to install SIGTERM handler: {_e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(_e) = signal::ctrl_c().await {
            #[cfg(feature = "tracing")]
            tracing::warn!("Failed to install Ctrl+C handler: {_e}");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => {
            #[cfg(feature = "tracing")]
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            #[cfg(feature = "tracing")]
            tracing::info!("Received SIGTERM signal");
        },
    }
}
