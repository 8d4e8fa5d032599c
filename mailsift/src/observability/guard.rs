//! Fault containment for the pure pipeline functions.
//!
//! A panic inside a guarded closure is caught at the function boundary,
//! reported to an event sink as `<operation>.failed`, and replaced by the
//! caller's fallback value. The caller never sees the fault.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::events::{get_event_sink, EventSink};

/// Runs `f`, reporting faults to the process-wide sink.
pub fn guarded<T>(operation: &str, fallback: T, f: impl FnOnce() -> T) -> T {
    guarded_with(get_event_sink().as_ref(), operation, fallback, f)
}

/// Runs `f`, reporting faults to `sink`.
pub fn guarded_with<T>(
    sink: &dyn EventSink,
    operation: &str,
    fallback: T,
    f: impl FnOnce() -> T,
) -> T {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(operation, error = %message, "Recovered from internal fault");
            sink.try_emit(
                &format!("{operation}.failed"),
                Some(serde_json::json!({ "operation": operation, "error": message })),
            );
            fallback
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
