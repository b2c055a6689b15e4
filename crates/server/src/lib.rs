//! HTTP surface for the stream ranking core.

pub mod api;
pub mod metrics;
pub mod state;
