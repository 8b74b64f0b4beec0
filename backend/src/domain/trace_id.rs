//! Correlation id for one admin request.
//!
//! The [`Trace`](crate::middleware::Trace) middleware mints an id per request
//! and runs the handler inside [`TraceId::scope`]; errors built anywhere below
//! the handler pick it up through [`TraceId::current`]. Task-locals do not
//! follow `tokio::spawn` or `spawn_blocking`, so work moved off the request
//! task sees no id unless it is scoped again.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use uuid::Uuid;

/// Response header echoing the request's trace id.
pub const TRACE_ID_HEADER: &str = "trace-id";

tokio::task_local! {
    static CURRENT: TraceId;
}

/// Random UUID identifying one request in logs and error envelopes.
///
/// # Examples
/// ```
/// use devassist::TraceId;
///
/// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
/// let id: TraceId = "6f1c2a4e-0d3b-4f7a-9c55-1b2e3d4f5a6b".parse().expect("uuid");
/// let seen = id.scope(async { TraceId::current() }).await;
/// assert_eq!(seen, Some(id));
/// assert_eq!(TraceId::current(), None);
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The id of the request being served, if any.
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with this id as the current one.
    pub fn scope<F: Future>(self, fut: F) -> impl Future<Output = F::Output> {
        CURRENT.scope(self, fut)
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.parse().map(Self)
    }
}
