use crate::{error::ServiceError, service::handler::Reply, telemetry::InflightGuard};
use core::fmt;
use pesel::{CalendarDate, Fragment, FragmentSearch, Results, SearchRequest};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

/// A unit of work a worker runs from start to finish.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Job {
    /// One of the engine's lookups.
    Request(SearchRequest),
    /// A fragment sweep limited to an inclusive date window.
    FragmentWithin {
        fragment: Fragment,
        from: CalendarDate,
        to: CalendarDate,
    },
}

impl Job {
    pub fn run(&self) -> Results {
        match *self {
            Self::Request(request) => request.run(),
            Self::FragmentWithin { fragment, from, to } => {
                Results::ByFragment(FragmentSearch::within(fragment, from, to))
            }
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Request(request) => request.kind(),
            Self::FragmentWithin { .. } => "by_fragment_within",
        }
    }
}

impl From<SearchRequest> for Job {
    fn from(request: SearchRequest) -> Self {
        Self::Request(request)
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(request) => fmt::Display::fmt(request, f),
            Self::FragmentWithin { fragment, from, to } => {
                write!(f, "by fragment {fragment} from {from} to {to}")
            }
        }
    }
}

/// Internal messages sent to worker tasks.
pub enum WorkRequest {
    /// Run a job and stream its results into `reply_tx`.
    Lookup {
        job: Job,
        reply_tx: mpsc::Sender<Result<Reply, ServiceError>>,
        cancel: CancellationToken,
        inflight: InflightGuard,
    },
    /// Stop the worker and acknowledge on `response`.
    Shutdown { response: oneshot::Sender<()> },
}
