//! Seams between the crawl traversal and the outside world.
//!
//! The traversal never talks to the network or to storage directly: pages
//! come from a [`Fetcher`] and records go to a [`RecordSink`], so tests can
//! swap in an in-memory site and an in-memory sink.

pub mod fetcher;
pub mod sink;
