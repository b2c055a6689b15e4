//! Bounded, expiring cache for upstream fetch results.

mod ttl_cache;

pub use ttl_cache::{fetch_signature, TtlCache};
