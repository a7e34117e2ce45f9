//! Resolution engine: handler selection and chain folding.
//!
//! Given the handler table, a failure, and the attempt number, the engine picks the first
//! handler whose category matches (registration order is the tie-break), fires its
//! `on_select` callback, and folds its links into one [`Outcome`].
//!
//! Folding starts from `Stop`. Each link runs its modifier, resolves its reaction, and the
//! result is combined into the running outcome. The fold returns as soon as the running
//! outcome is `Continue`, so links after an active retry budget only run once that budget is
//! exhausted.

use crate::{Handler, Link, Outcome};

/// Result of resolving one failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No handler's category matched.
    Unhandled,
    /// Handler at index `handler` folded to `outcome`.
    Handled { handler: usize, outcome: Outcome },
}

impl Resolution {
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Resolution::Unhandled => None,
            Resolution::Handled { outcome, .. } => Some(*outcome),
        }
    }
}

/// Index of the first handler matching `failure`.
pub fn select<E>(handlers: &[Handler<'_, E>], failure: &E) -> Option<usize> {
    handlers.iter().position(|handler| handler.matches(failure))
}

/// Fold `links` for one failure on `attempt`.
pub fn fold<E>(links: &mut [Link<'_, E>], failure: &E, attempt: u32) -> Outcome {
    let mut result = Outcome::Stop;
    for link in links.iter_mut() {
        let current = link.run(failure, attempt);
        result = result.combine(current);
        if result == Outcome::Continue {
            return Outcome::Continue;
        }
    }
    result
}

/// Select a handler for `failure`, fire its `on_select` callback, and fold its chain.
pub fn resolve<E>(handlers: &mut [Handler<'_, E>], failure: &E, attempt: u32) -> Resolution {
    let Some(index) = select(handlers, failure) else {
        return Resolution::Unhandled;
    };
    let handler = &mut handlers[index];
    handler.selected();
    let outcome = fold(handler.links_mut(), failure, attempt);
    Resolution::Handled { handler: index, outcome }
}
