//! Upstream stream providers and their concurrent aggregation.

mod aggregator;
mod http;
mod types;

pub use aggregator::StreamAggregator;
pub use http::HttpStreamSource;
pub use types::*;
