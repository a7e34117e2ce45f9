#![forbid(unsafe_code)]
#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::all))]

//! # failsafe
//!
//! Declarative failure handling for fallible operations: classify a failure, then retry,
//! suppress, unwind, or propagate it through an ordered chain of reactions, with side effects
//! (logging, cleanup, backoff pauses) interleaved per attempt.
//!
//! ## Features
//!
//! - **Handlers** keyed by failure category, matched in registration order, subtype-inclusive
//! - **Reaction chains** folded into a single decision with a small outcome algebra
//! - **Retry budgets** with configurable fallbacks
//! - **Success and finally callbacks** with guaranteed single execution
//! - **Pauses** built from backoff curves, jitter, and a caller-supplied sleeper
//! - **Telemetry** through pluggable event sinks, logged with `tracing` by default
//!
//! ## Quick Start
//!
//! ```rust
//! use failsafe::{Category, Failsafe, FailsafeError, Handler, Link};
//! use std::cell::Cell;
//!
//! #[derive(Debug)]
//! struct Unavailable;
//!
//! let failures = Cell::new(0);
//! let result = Failsafe::run(|| Err::<(), _>(Unavailable))
//!     .handle(
//!         Handler::on(Category::any())
//!             .link(Link::retry(3).modify(|| failures.set(failures.get() + 1))),
//!     )
//!     .execute();
//!
//! assert!(matches!(result, Err(FailsafeError::Failed { attempt: 3, .. })));
//! assert_eq!(failures.get(), 3);
//! ```

pub mod backoff;
pub mod category;
pub mod engine;
pub mod error;
pub mod handler;
pub mod jitter;
pub mod outcome;
pub mod pause;
pub mod prelude;
pub mod presets;
pub mod reaction;
pub mod resolution;
pub mod sleeper;
pub mod telemetry;

// Re-exports
pub use backoff::{Backoff, BackoffError, MAX_PAUSE};
pub use category::{BoxError, Category, Classified, FailureKind};
pub use engine::{Completion, Failsafe, FailsafeBuilder};
pub use error::{ConfigError, FailsafeError};
pub use handler::{Handler, HandlerBuilder, Link, Modifier};
pub use jitter::{Jitter, JitterError};
pub use outcome::Outcome;
pub use pause::Pause;
pub use reaction::Reaction;
pub use resolution::Resolution;
pub use sleeper::{InstantSleeper, Sleeper, ThreadSleeper, TrackingSleeper};
