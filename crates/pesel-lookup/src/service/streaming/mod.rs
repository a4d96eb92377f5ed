//! Per-lookup work: the messages workers receive and the loop that turns an
//! engine iterator into streamed batches.

pub mod processor;
pub mod request;
