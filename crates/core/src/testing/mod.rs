//! Testing utilities and mock implementations.
//!
//! This module provides a mock [`StreamSource`](crate::source::StreamSource)
//! and fixtures, allowing aggregation and ranking tests without real
//! upstream services.
//!
//! # Example
//!
//! ```rust,ignore
//! use streamrank_core::testing::{fixtures, MockStreamSource};
//!
//! let source = MockStreamSource::new("torrentio");
//! source.set_streams(vec![
//!     fixtures::stream("2160p", 10, 18.0),
//!     fixtures::stream("1080p", 80, 2.5),
//! ]).await;
//!
//! // Use in a StreamAggregator...
//! ```

mod mock_source;

pub use mock_source::MockStreamSource;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::source::RawStream;

    /// Create a stream in the usual addon shape: quality tag on the second
    /// line of `name`, seeders and size annotated in `title`.
    pub fn stream(quality: &str, seeders: u32, size_gb: f64) -> RawStream {
        RawStream {
            name: Some(format!("Torrentio\n{}", quality)),
            title: Some(format!(
                "Movie.2023.{}.WEB-DL\n👤 {} 💾 {} GB",
                quality, seeders, size_gb
            )),
            info_hash: Some(format!("{:0>40}", seeders)),
            ..Default::default()
        }
    }

    /// Like [`stream`] with a language marker in the title.
    pub fn stream_with_language(
        quality: &str,
        seeders: u32,
        size_gb: f64,
        language: &str,
    ) -> RawStream {
        let mut s = stream(quality, seeders, size_gb);
        s.title = Some(format!(
            "Movie.2023.{}.{}.WEB-DL\n👤 {} 💾 {} GB",
            quality, language, seeders, size_gb
        ));
        s
    }

    /// A stream with no quality tag, seeders or size.
    pub fn bare_stream(title: &str) -> RawStream {
        RawStream {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    /// JSON body in the addon stream protocol shape, for HTTP mocks.
    pub fn streams_body(streams: &[RawStream]) -> serde_json::Value {
        serde_json::json!({ "streams": streams })
    }
}
