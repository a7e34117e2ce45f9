//! The retry loop.
//!
//! [`Failsafe::execute`] owns the attempt counter for one call. It invokes the protected
//! operation and, on failure, asks the resolution engine what to do:
//!
//! - no handler matched, or the chain folded to `Propagate`: return
//!   [`FailsafeError::Failed`] with the original failure as its cause;
//! - `Continue`: invoke the operation again;
//! - `Stop`: return [`Completion::Absorbed`]; the success callback does not run.
//!
//! The success callback runs once, only when the operation itself succeeds. The finally
//! callback runs once on every exit path after an operation was configured, including panics
//! raised by the operation, a modifier, or a callback.
//!
//! Semantics:
//! - Attempts are 1-based and incremented before each invocation.
//! - The handler table is consumed with the `Failsafe`; nothing carries over between calls.
//! - Everything runs on the caller's thread; the loop itself never sleeps.
//!
//! ```rust
//! use failsafe::{Category, Completion, Failsafe, Handler, Link, Reaction};
//! use std::cell::Cell;
//!
//! #[derive(Debug)]
//! struct Flaky;
//!
//! let calls = Cell::new(0);
//! let gave_up = Cell::new(false);
//! let completion = Failsafe::run(|| {
//!     calls.set(calls.get() + 1);
//!     Err::<(), _>(Flaky)
//! })
//! .handle(
//!     Handler::on(Category::any())
//!         .retry_then(3, Reaction::Stop)
//!         .link(Link::suppress().modify(|| gave_up.set(true))),
//! )
//! .execute()
//! .unwrap();
//!
//! assert_eq!(completion, Completion::Absorbed { attempts: 3 });
//! assert_eq!(calls.get(), 3);
//! assert!(gave_up.get());
//! ```

use crate::error::{ConfigError, FailsafeError};
use crate::resolution;
use crate::telemetry::{EventSink, FailsafeEvent, LogSink};
use crate::{Handler, Outcome};
use std::fmt;

type Operation<'a, T, E> = Box<dyn FnMut() -> Result<T, E> + 'a>;
type Callback<'a> = Box<dyn FnOnce() + 'a>;

/// How a successful `execute` call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<T> {
    /// The protected operation succeeded on attempt `attempts`.
    Succeeded { value: T, attempts: u32 },
    /// A handler absorbed the failure on attempt `attempts`.
    Absorbed { attempts: u32 },
}

impl<T> Completion<T> {
    /// Attempt on which the call ended.
    pub fn attempts(&self) -> u32 {
        match self {
            Completion::Succeeded { attempts, .. } | Completion::Absorbed { attempts } => *attempts,
        }
    }

    /// True when the operation itself returned a value.
    pub fn is_success(&self) -> bool {
        matches!(self, Completion::Succeeded { .. })
    }

    /// Borrow the operation's value, if it succeeded.
    pub fn value(&self) -> Option<&T> {
        match self {
            Completion::Succeeded { value, .. } => Some(value),
            Completion::Absorbed { .. } => None,
        }
    }

    /// Take the operation's value, if it succeeded.
    pub fn into_value(self) -> Option<T> {
        match self {
            Completion::Succeeded { value, .. } => Some(value),
            Completion::Absorbed { .. } => None,
        }
    }
}

/// A protected operation together with its frozen handler table.
pub struct Failsafe<'a, T, E> {
    operation: Option<Operation<'a, T, E>>,
    handlers: Vec<Handler<'a, E>>,
    on_success: Option<Callback<'a>>,
    finally: Option<Callback<'a>>,
    sink: Box<dyn EventSink + 'a>,
}

impl<T, E> fmt::Debug for Failsafe<'_, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failsafe")
            .field("operation", &self.operation.as_ref().map(|_| "<operation>"))
            .field("handlers", &self.handlers)
            .field("on_success", &self.on_success.as_ref().map(|_| "<callback>"))
            .field("finally", &self.finally.as_ref().map(|_| "<callback>"))
            .field("sink", &self.sink)
            .finish()
    }
}

impl<'a, T, E> Failsafe<'a, T, E> {
    /// Builder with no operation configured.
    pub fn builder() -> FailsafeBuilder<'a, T, E> {
        FailsafeBuilder::new()
    }

    /// Builder protecting `operation`.
    pub fn run<F>(operation: F) -> FailsafeBuilder<'a, T, E>
    where
        F: FnMut() -> Result<T, E> + 'a,
    {
        FailsafeBuilder::new().run(operation)
    }

    /// Registered handlers in match order.
    pub fn handlers(&self) -> &[Handler<'a, E>] {
        &self.handlers
    }

    /// Run the retry loop to completion.
    pub fn execute(self) -> Result<Completion<T>, FailsafeError<E>> {
        let Failsafe { operation, mut handlers, on_success, finally, sink } = self;
        let Some(mut operation) = operation else {
            return Err(ConfigError::MissingOperation.into());
        };

        let _finally = Finally(finally);
        let completion = retry_loop(&mut operation, &mut handlers, sink.as_ref())?;
        if completion.is_success() {
            if let Some(callback) = on_success {
                callback();
            }
        }
        Ok(completion)
    }
}

/// Runs the finally callback when dropped, so it also fires while unwinding.
struct Finally<'a>(Option<Callback<'a>>);

impl Drop for Finally<'_> {
    fn drop(&mut self) {
        if let Some(callback) = self.0.take() {
            callback();
        }
    }
}

fn retry_loop<T, E>(
    operation: &mut Operation<'_, T, E>,
    handlers: &mut [Handler<'_, E>],
    sink: &dyn EventSink,
) -> Result<Completion<T>, FailsafeError<E>> {
    let mut attempt: u32 = 0;
    loop {
        attempt = attempt.saturating_add(1);
        let failure = match operation() {
            Ok(value) => {
                sink.emit(&FailsafeEvent::Succeeded { attempts: attempt });
                return Ok(Completion::Succeeded { value, attempts: attempt });
            }
            Err(failure) => failure,
        };
        sink.emit(&FailsafeEvent::AttemptFailed { attempt });

        let Some(handler) = resolution::select(handlers, &failure) else {
            sink.emit(&FailsafeEvent::Unhandled { attempt });
            sink.emit(&FailsafeEvent::Propagated { attempts: attempt });
            tracing::warn!(attempt, "failsafe: no handler matched failure, propagating");
            return Err(FailsafeError::Failed { attempt, cause: failure });
        };
        let selected = &mut handlers[handler];
        sink.emit(&FailsafeEvent::HandlerSelected {
            attempt,
            handler,
            category: selected.category().label().to_owned().into(),
        });
        selected.selected();
        let outcome = resolution::fold(selected.links_mut(), &failure, attempt);
        sink.emit(&FailsafeEvent::Resolved { attempt, outcome });

        match outcome {
            Outcome::Continue => continue,
            Outcome::Propagate => {
                sink.emit(&FailsafeEvent::Propagated { attempts: attempt });
                tracing::warn!(attempt, handler, "failsafe: handler propagated failure");
                return Err(FailsafeError::Failed { attempt, cause: failure });
            }
            // `combine` never yields Suppressed; treat it as the Stop it would fold into.
            Outcome::Stop | Outcome::Suppressed => {
                sink.emit(&FailsafeEvent::Absorbed { attempts: attempt });
                return Ok(Completion::Absorbed { attempts: attempt });
            }
        }
    }
}

/// Builder for [`Failsafe`].
pub struct FailsafeBuilder<'a, T, E> {
    operation: Option<Operation<'a, T, E>>,
    handlers: Vec<Handler<'a, E>>,
    on_success: Option<Callback<'a>>,
    finally: Option<Callback<'a>>,
    sink: Box<dyn EventSink + 'a>,
}

impl<'a, T, E> FailsafeBuilder<'a, T, E> {
    /// Empty builder logging events through [`LogSink`].
    pub fn new() -> Self {
        Self {
            operation: None,
            handlers: Vec::new(),
            on_success: None,
            finally: None,
            sink: Box::new(LogSink),
        }
    }

    /// Set the protected operation. Replaces any previous one.
    pub fn run<F>(mut self, operation: F) -> Self
    where
        F: FnMut() -> Result<T, E> + 'a,
    {
        self.operation = Some(Box::new(operation));
        self
    }

    /// Register a handler. Handlers are consulted in registration order.
    pub fn handle<H>(mut self, handler: H) -> Self
    where
        H: Into<Handler<'a, E>>,
    {
        self.handlers.push(handler.into());
        self
    }

    /// Callback run once when the operation succeeds.
    pub fn on_success<F>(mut self, callback: F) -> Self
    where
        F: FnOnce() + 'a,
    {
        self.on_success = Some(Box::new(callback));
        self
    }

    /// Callback run once when `execute` finishes, whatever the result.
    pub fn finally<F>(mut self, callback: F) -> Self
    where
        F: FnOnce() + 'a,
    {
        self.finally = Some(Box::new(callback));
        self
    }

    /// Send telemetry to `sink` instead of the default `LogSink`.
    pub fn with_sink<S>(mut self, sink: S) -> Self
    where
        S: EventSink + 'a,
    {
        self.sink = Box::new(sink);
        self
    }

    pub fn build(self) -> Failsafe<'a, T, E> {
        Failsafe {
            operation: self.operation,
            handlers: self.handlers,
            on_success: self.on_success,
            finally: self.finally,
            sink: self.sink,
        }
    }

    /// Shorthand for `build().execute()`.
    pub fn execute(self) -> Result<Completion<T>, FailsafeError<E>> {
        self.build().execute()
    }
}

impl<'a, T, E> Default for FailsafeBuilder<'a, T, E> {
    fn default() -> Self {
        Self::new()
    }
}
