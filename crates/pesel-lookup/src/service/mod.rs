//! Lookup service implementation and worker coordination logic.
//!
//! ## Structure
//!
//! - [`handler`] - caller-facing entry point (`LookupService`, `Lookup`).
//! - [`pool`] - worker tasks and round-robin dispatch.
//! - [`streaming`] - work messages and the batching loop.

pub mod handler;
pub mod pool;
pub mod streaming;
