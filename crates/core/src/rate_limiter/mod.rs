//! Per-key sliding-window admission control.
//!
//! Shields upstream sources from bursts: each key (a source name) may be
//! admitted at most `max_requests` times within any trailing window. A
//! background sweeper compacts idle keys on a fixed schedule.

mod sliding_window;

pub use sliding_window::{
    SlidingWindowConfig, SlidingWindowLimiter, SweepReport, MIN_SWEEP_INTERVAL,
};
