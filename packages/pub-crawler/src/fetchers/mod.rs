//! Fetcher implementations.
//!
//! - `HttpFetcher` - reqwest-backed HTTP fetching
//! - `MockFetcher` - in-memory site for tests and fixture replay

mod http;
mod mock;

pub use http::HttpFetcher;
pub use mock::MockFetcher;

pub use crate::traits::fetcher::{FetchedPage, Fetcher};
