//! Optional event callbacks for embedders.
//!
//! Every stateful component accepts an [`EventHook`] that receives
//! `(event, detail)` pairs. Hooks observe only: a missing hook never changes
//! behavior, and structured `tracing` logging happens either way.

use std::sync::Arc;

/// Callback invoked with an event name and a free-form detail string.
pub type EventHook = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// Invoke the hook if one is installed.
pub(crate) fn emit(hook: &Option<EventHook>, event: &str, detail: &str) {
    if let Some(hook) = hook {
        hook(event, detail);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, Mutex};

    use super::EventHook;

    /// Hook that records every event for later assertions.
    pub fn recording_hook() -> (EventHook, Arc<Mutex<Vec<(String, String)>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let hook: EventHook = Arc::new(move |event: &str, detail: &str| {
            sink.lock()
                .unwrap()
                .push((event.to_string(), detail.to_string()));
        });
        (hook, events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_without_hook_is_noop() {
        emit(&None, "anything", "detail");
    }

    #[test]
    fn test_emit_with_hook_records() {
        let (hook, events) = test_support::recording_hook();
        emit(&Some(hook), "cache_hit", "key=a");

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], ("cache_hit".to_string(), "key=a".to_string()));
    }
}
