//! Search Module
//!
//! Job listing search backed by the SerpAPI Google Jobs engine. One
//! paginated fetch pass per location filter, accumulating normalized
//! records until end-of-results, a missing cursor token, or the
//! configured accumulation cap.

pub mod serpapi;

pub use serpapi::{JobSearchClient, SearchError};
