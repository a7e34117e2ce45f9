//! Telemetry for the retry loop.
//!
//! Every `execute` call reports what it does as [`FailsafeEvent`]s delivered to an
//! [`EventSink`]. Sinks are best effort: they must not fail the loop, so `emit` returns nothing
//! and implementations swallow their own errors.
//!
//! # Event Types
//!
//! - `AttemptFailed`: the protected operation failed on an attempt.
//! - `HandlerSelected`: a handler's category matched that failure.
//! - `Resolved`: the handler's chain folded to an outcome.
//! - `Unhandled`: no handler matched.
//! - `Succeeded`, `Absorbed`, `Propagated`: how the call ended.
//!
//! # Sinks
//!
//! - [`NullSink`] drops everything.
//! - [`LogSink`] logs through `tracing` (the default).
//! - [`MemorySink`] keeps a bounded in-memory history, useful in tests.
//! - [`MulticastSink`] forwards to two sinks.
//! - `JsonlSink` writes one JSON object per line (feature `telemetry-json`).
//!
//! ```rust
//! use failsafe::telemetry::{EventSink, FailsafeEvent, MemorySink};
//!
//! let sink = MemorySink::new();
//! sink.emit(&FailsafeEvent::AttemptFailed { attempt: 1 });
//! assert_eq!(sink.events(), vec![FailsafeEvent::AttemptFailed { attempt: 1 }]);
//! ```

use crate::Outcome;
use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Default number of events kept by [`MemorySink::new`].
pub const DEFAULT_MEMORY_SINK_CAPACITY: usize = 10_000;

/// Structured event emitted by the retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum FailsafeEvent {
    AttemptFailed { attempt: u32 },
    HandlerSelected { attempt: u32, handler: usize, category: Cow<'static, str> },
    Resolved { attempt: u32, outcome: Outcome },
    Unhandled { attempt: u32 },
    Succeeded { attempts: u32 },
    Absorbed { attempts: u32 },
    Propagated { attempts: u32 },
}

impl fmt::Display for FailsafeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailsafeEvent::AttemptFailed { attempt } => write!(f, "AttemptFailed(attempt={})", attempt),
            FailsafeEvent::HandlerSelected { attempt, handler, category } => write!(
                f,
                "HandlerSelected(attempt={}, handler={}, category={})",
                attempt, handler, category
            ),
            FailsafeEvent::Resolved { attempt, outcome } => {
                write!(f, "Resolved(attempt={}, outcome={})", attempt, outcome)
            }
            FailsafeEvent::Unhandled { attempt } => write!(f, "Unhandled(attempt={})", attempt),
            FailsafeEvent::Succeeded { attempts } => write!(f, "Succeeded(attempts={})", attempts),
            FailsafeEvent::Absorbed { attempts } => write!(f, "Absorbed(attempts={})", attempts),
            FailsafeEvent::Propagated { attempts } => {
                write!(f, "Propagated(attempts={})", attempts)
            }
        }
    }
}

/// Consumer of [`FailsafeEvent`]s.
pub trait EventSink: fmt::Debug {
    fn emit(&self, event: &FailsafeEvent);
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn emit(&self, event: &FailsafeEvent) {
        (**self).emit(event)
    }
}

/// Drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &FailsafeEvent) {}
}

/// Logs events with `tracing` at DEBUG level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: &FailsafeEvent) {
        tracing::debug!(event = %event, "failsafe_event");
    }
}

/// Bounded in-memory event history. Oldest events are evicted once full.
#[derive(Clone, Debug)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<FailsafeEvent>>>,
    capacity: usize,
    evicted: Arc<AtomicU64>,
}

impl MemorySink {
    /// Sink holding up to [`DEFAULT_MEMORY_SINK_CAPACITY`] events.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_SINK_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            capacity,
            evicted: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Snapshot of the retained events, oldest first.
    pub fn events(&self) -> Vec<FailsafeEvent> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of events dropped to stay within capacity.
    pub fn evicted(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<FailsafeEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &FailsafeEvent) {
        if self.capacity == 0 {
            self.evicted.fetch_add(1, Ordering::Relaxed);
            return;
        }
        let mut events = self.lock();
        if events.len() >= self.capacity {
            events.remove(0);
            self.evicted.fetch_add(1, Ordering::Relaxed);
        }
        events.push(event.clone());
    }
}

/// Forwards every event to both sinks, `A` first.
#[derive(Clone, Debug)]
pub struct MulticastSink<A, B> {
    first: A,
    second: B,
}

impl<A, B> MulticastSink<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: EventSink, B: EventSink> EventSink for MulticastSink<A, B> {
    fn emit(&self, event: &FailsafeEvent) {
        self.first.emit(event);
        self.second.emit(event);
    }
}

#[cfg(feature = "telemetry-json")]
pub use jsonl::JsonlSink;

#[cfg(feature = "telemetry-json")]
mod jsonl {
    use super::{EventSink, FailsafeEvent};
    use std::fmt;
    use std::io::Write;
    use std::sync::Mutex;

    /// Writes each event as one JSON line. Write errors are logged and dropped.
    pub struct JsonlSink<W: Write> {
        writer: Mutex<W>,
    }

    impl<W: Write> JsonlSink<W> {
        pub fn new(writer: W) -> Self {
            Self { writer: Mutex::new(writer) }
        }

        pub fn into_inner(self) -> W {
            self.writer.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }

    impl<W: Write> fmt::Debug for JsonlSink<W> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("JsonlSink").field("writer", &"<writer>").finish()
        }
    }

    impl<W: Write> EventSink for JsonlSink<W> {
        fn emit(&self, event: &FailsafeEvent) {
            let mut writer = self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let written = serde_json::to_writer(&mut *writer, event)
                .map_err(std::io::Error::from)
                .and_then(|()| writer.write_all(b"\n"));
            if let Err(err) = written {
                tracing::warn!(error = %err, "failsafe jsonl sink write failed");
            }
        }
    }
}
