//! Developer assistant service library.
//!
//! Handlers in [`inbound`] translate HTTP requests into calls on the domain
//! services in [`domain`], which reach models, storage and the filesystem
//! through the adapters in [`outbound`].

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use domain::TraceId;
pub use middleware::Trace;
