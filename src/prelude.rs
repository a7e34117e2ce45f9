//! Convenient re-exports for common failsafe types.
pub use crate::{
    backoff::{Backoff, BackoffError, MAX_PAUSE},
    category::{Category, Classified, FailureKind},
    engine::{Completion, Failsafe},
    handler::{Handler, Link},
    jitter::Jitter,
    pause::Pause,
    reaction::Reaction,
    sleeper::{Sleeper, ThreadSleeper},
    telemetry::{EventSink, FailsafeEvent, LogSink, MemorySink},
    ConfigError, FailsafeError, Outcome,
};
