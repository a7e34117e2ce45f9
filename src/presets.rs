//! Ready-made handler shapes.
//!
//! Each preset returns a [`HandlerBuilder`], so further links or an `on_select` callback can
//! still be added before the handler is registered.
//!
//! ```rust
//! use failsafe::{presets, Category, Completion, Failsafe};
//!
//! #[derive(Debug)]
//! struct Offline;
//!
//! let result = Failsafe::run(|| Err::<(), _>(Offline))
//!     .handle(presets::retry_then_suppress(Category::any(), 2))
//!     .execute();
//! assert_eq!(result.unwrap(), Completion::Absorbed { attempts: 2 });
//! ```

use crate::{Category, HandlerBuilder, Link, Pause, Reaction};

/// Retry while `attempt < attempts`, then propagate.
pub fn retry<'a, E>(category: Category<E>, attempts: u32) -> HandlerBuilder<'a, E> {
    HandlerBuilder::new(category).retry(attempts)
}

/// Retry while `attempt < attempts`, then absorb the failure.
pub fn retry_then_suppress<'a, E>(category: Category<E>, attempts: u32) -> HandlerBuilder<'a, E> {
    HandlerBuilder::new(category).retry_then(attempts, Reaction::Suppress)
}

/// Retry with a pause between attempts, then propagate.
pub fn retry_with_pause<'a, E>(
    category: Category<E>,
    attempts: u32,
    pause: Pause,
) -> HandlerBuilder<'a, E> {
    HandlerBuilder::new(category).link(Link::retry(attempts).pause(pause))
}

/// Absorb the failure on the first occurrence.
pub fn suppress<'a, E>(category: Category<E>) -> HandlerBuilder<'a, E> {
    HandlerBuilder::new(category).suppress()
}

/// Re-raise the failure on the first occurrence.
pub fn propagate<'a, E>(category: Category<E>) -> HandlerBuilder<'a, E> {
    HandlerBuilder::new(category).propagate()
}
