//! Sliding-window rate limiter with a cancellable sweeper.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::events::{emit, EventHook};
use crate::metrics::{LIMITER_SWEEPS, RATE_LIMIT_DECISIONS};

/// Limits for a [`SlidingWindowLimiter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlidingWindowConfig {
    /// Trailing window length.
    pub window: Duration,
    /// Max admitted requests per key within `window`.
    pub max_requests: usize,
    /// Hard ceiling on tracked keys, enforced by the sweeper.
    pub max_tracked_keys: usize,
    /// How often the sweeper runs.
    pub sweep_interval: Duration,
}

impl Default for SlidingWindowConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(60),
            max_requests: 30,
            max_tracked_keys: 10_000,
            sweep_interval: Duration::from_secs(60),
        }
    }
}

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Keys dropped because no timestamp was left in the window.
    pub removed_empty: usize,
    /// Keys dropped to get back under `max_tracked_keys`.
    pub evicted: usize,
    /// Keys still tracked after the sweep.
    pub tracked: usize,
}

/// Shortest sweep period; `tokio::time::interval` rejects zero.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

type Windows = HashMap<String, VecDeque<Instant>>;

/// Per-key sliding-window limiter.
///
/// Every decision runs under a single mutex, so concurrent callers for the
/// same key can never jointly exceed `max_requests` within the window.
pub struct SlidingWindowLimiter {
    config: SlidingWindowConfig,
    windows: Arc<Mutex<Windows>>,
    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
    event_hook: Option<EventHook>,
}

impl SlidingWindowLimiter {
    pub fn new(mut config: SlidingWindowConfig) -> Self {
        if config.sweep_interval < MIN_SWEEP_INTERVAL {
            warn!(
                sweep_interval_ms = config.sweep_interval.as_millis() as u64,
                "Sweep interval too short, clamping to 1ms"
            );
            config.sweep_interval = MIN_SWEEP_INTERVAL;
        }
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            config,
            windows: Arc::new(Mutex::new(HashMap::new())),
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
            sweeper: Mutex::new(None),
            event_hook: None,
        }
    }

    /// Install a callback receiving `(event, detail)` for denials and sweeps.
    pub fn with_event_hook(mut self, hook: EventHook) -> Self {
        self.event_hook = Some(hook);
        self
    }

    pub fn config(&self) -> &SlidingWindowConfig {
        &self.config
    }

    /// Admit one request for `key` if the window has room.
    ///
    /// A denial leaves the key's state untouched.
    pub async fn is_allowed(&self, key: &str) -> bool {
        let now = Instant::now();
        let window = self.config.window;
        let mut windows = self.windows.lock().await;

        let in_window = windows
            .get(key)
            .map(|ts| count_in_window(ts, now, window))
            .unwrap_or(0);

        if in_window >= self.config.max_requests {
            RATE_LIMIT_DECISIONS.with_label_values(&["denied"]).inc();
            debug!(key = key, in_window = in_window, "Rate limit denied");
            emit(&self.event_hook, "rate_limited", key);
            return false;
        }

        let timestamps = windows.entry(key.to_string()).or_default();
        drop_stale(timestamps, now, window);
        timestamps.push_back(now);

        RATE_LIMIT_DECISIONS.with_label_values(&["allowed"]).inc();
        true
    }

    /// Number of keys currently tracked.
    pub async fn tracked_keys(&self) -> usize {
        self.windows.lock().await.len()
    }

    /// Run one compaction pass now.
    pub async fn sweep(&self) -> SweepReport {
        let mut windows = self.windows.lock().await;
        sweep_windows(&mut windows, Instant::now(), &self.config, &self.event_hook)
    }

    /// Spawn the recurring sweeper. Calling it while running is a no-op.
    ///
    /// The sweeper stops on [`stop`](Self::stop) or when the limiter is
    /// dropped.
    pub async fn start_sweeper(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Rate limiter sweeper already running");
            return;
        }

        let windows = Arc::clone(&self.windows);
        let running = Arc::clone(&self.running);
        let config = self.config.clone();
        let hook = self.event_hook.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        let handle = tokio::spawn(async move {
            info!(
                interval_ms = config.sweep_interval.as_millis() as u64,
                "Rate limiter sweeper started"
            );
            let mut ticker = tokio::time::interval(config.sweep_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Rate limiter sweeper received shutdown signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        if !running.load(Ordering::Relaxed) {
                            break;
                        }
                        let mut guard = windows.lock().await;
                        sweep_windows(&mut guard, Instant::now(), &config, &hook);
                    }
                }
            }
            info!("Rate limiter sweeper stopped");
        });

        *self.sweeper.lock().await = Some(handle);
    }

    /// Stop the sweeper and wait for it to finish.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            debug!("Rate limiter sweeper not running");
            return;
        }

        let _ = self.shutdown_tx.send(());
        if let Some(handle) = self.sweeper.lock().await.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Rate limiter sweeper task failed");
            }
        }
    }

    pub fn is_sweeping(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

fn is_fresh(ts: Instant, now: Instant, window: Duration) -> bool {
    now.saturating_duration_since(ts) <= window
}

fn count_in_window(timestamps: &VecDeque<Instant>, now: Instant, window: Duration) -> usize {
    timestamps
        .iter()
        .rev()
        .take_while(|ts| is_fresh(**ts, now, window))
        .count()
}

fn drop_stale(timestamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(front) = timestamps.front() {
        if is_fresh(*front, now, window) {
            break;
        }
        timestamps.pop_front();
    }
}

fn sweep_windows(
    windows: &mut Windows,
    now: Instant,
    config: &SlidingWindowConfig,
    hook: &Option<EventHook>,
) -> SweepReport {
    let before = windows.len();
    windows.retain(|_, timestamps| {
        drop_stale(timestamps, now, config.window);
        !timestamps.is_empty()
    });
    let removed_empty = before - windows.len();

    let mut evicted = 0;
    if windows.len() > config.max_tracked_keys {
        // Least recently active first; ties broken by key for determinism.
        let mut by_activity: Vec<(Instant, String)> = windows
            .iter()
            .filter_map(|(key, ts)| ts.back().map(|last| (*last, key.clone())))
            .collect();
        by_activity.sort();

        let excess = windows.len() - config.max_tracked_keys;
        for (_, key) in by_activity.into_iter().take(excess) {
            windows.remove(&key);
            evicted += 1;
        }
    }

    let report = SweepReport {
        removed_empty,
        evicted,
        tracked: windows.len(),
    };

    LIMITER_SWEEPS.inc();
    if removed_empty > 0 || evicted > 0 {
        debug!(
            removed_empty = removed_empty,
            evicted = evicted,
            tracked = report.tracked,
            "Rate limiter sweep"
        );
        emit(
            hook,
            "rate_limiter_sweep",
            &format!("removed_empty={} evicted={}", removed_empty, evicted),
        );
    }

    report
}
