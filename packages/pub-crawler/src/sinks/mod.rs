//! Record sink implementations.
//!
//! - `MemorySink` - collects records in memory (tests, CLI summaries)
//! - `JsonlSink` - appends one JSON object per record to a file

mod jsonl;
mod memory;

pub use jsonl::JsonlSink;
pub use memory::MemorySink;

pub use crate::traits::sink::RecordSink;
