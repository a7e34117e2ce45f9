//! Handlers and the chain links they fold.
//!
//! A [`Handler`] binds a [`Category`] to an ordered list of [`Link`]s. Each link is an
//! immutable snapshot of one step: an optional side-effecting [`Modifier`] and a [`Reaction`].
//! The modifier always runs before its reaction is resolved. A link may also carry a
//! [`Pause`], which waits after the modifier on attempts the link retries.
//!
//! ```rust
//! use failsafe::{Category, Handler, Link, Reaction};
//! use std::cell::Cell;
//!
//! let retries = Cell::new(0);
//! let handler: Handler<'_, std::io::Error> = Handler::on(Category::any())
//!     .link(Link::retry(3).modify(|| retries.set(retries.get() + 1)))
//!     .link(Link::suppress())
//!     .build();
//! assert_eq!(handler.links().len(), 2);
//! assert_eq!(handler.links()[0].reaction(), &Reaction::retry(3));
//! ```

use crate::{Category, Outcome, Pause, Reaction};
use std::fmt;

/// Side effect run by a link before its reaction is resolved.
pub enum Modifier<'a, E> {
    /// Takes no arguments.
    Nullary(Box<dyn FnMut() + 'a>),
    /// Receives the failure being handled.
    Failure(Box<dyn FnMut(&E) + 'a>),
    /// Receives the failure and the 1-based attempt number.
    Attempt(Box<dyn FnMut(&E, u32) + 'a>),
}

impl<'a, E> Modifier<'a, E> {
    fn apply(&mut self, failure: &E, attempt: u32) {
        match self {
            Modifier::Nullary(f) => f(),
            Modifier::Failure(f) => f(failure),
            Modifier::Attempt(f) => f(failure, attempt),
        }
    }
}

impl<E> fmt::Debug for Modifier<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Modifier::Nullary(_) => "Nullary",
            Modifier::Failure(_) => "Failure",
            Modifier::Attempt(_) => "Attempt",
        };
        f.debug_tuple(kind).field(&"<closure>").finish()
    }
}

/// One step of a handler chain.
pub struct Link<'a, E> {
    modifier: Option<Modifier<'a, E>>,
    pause: Option<Pause>,
    reaction: Reaction,
}

impl<'a, E> Link<'a, E> {
    /// Link with no modifier and no pause.
    pub fn new(reaction: Reaction) -> Self {
        Self { modifier: None, pause: None, reaction }
    }

    /// Retry while `attempt < limit`, then propagate.
    pub fn retry(limit: u32) -> Self {
        Self::new(Reaction::retry(limit))
    }

    /// Retry while `attempt < limit`, then resolve `fallback`.
    pub fn retry_then(limit: u32, fallback: Reaction) -> Self {
        Self::new(Reaction::retry_then(limit, fallback))
    }

    /// Retry on every attempt; only success ends the loop.
    pub fn continue_retrying() -> Self {
        Self::new(Reaction::Continue)
    }

    /// Absorb the failure unless a later link propagates it.
    pub fn suppress() -> Self {
        Self::new(Reaction::Suppress)
    }

    /// Mark a compensating step and stop retrying.
    pub fn unwind() -> Self {
        Self::new(Reaction::Unwind)
    }

    /// Stop retrying.
    pub fn stop() -> Self {
        Self::new(Reaction::Stop)
    }

    /// Re-raise the failure.
    pub fn propagate() -> Self {
        Self::new(Reaction::Propagate)
    }

    /// Run `f` before the reaction. Replaces any modifier already set on this link.
    pub fn modify<F>(mut self, f: F) -> Self
    where
        F: FnMut() + 'a,
    {
        self.modifier = Some(Modifier::Nullary(Box::new(f)));
        self
    }

    /// Run `f` with the failure before the reaction. Replaces any modifier already set.
    pub fn inspect<F>(mut self, f: F) -> Self
    where
        F: FnMut(&E) + 'a,
    {
        self.modifier = Some(Modifier::Failure(Box::new(f)));
        self
    }

    /// Run `f` with the failure and attempt number before the reaction. Replaces any modifier
    /// already set.
    pub fn observe<F>(mut self, f: F) -> Self
    where
        F: FnMut(&E, u32) + 'a,
    {
        self.modifier = Some(Modifier::Attempt(Box::new(f)));
        self
    }

    /// Block for the pause's delay on attempts where this link's own reaction asks for a retry.
    /// The wait follows the modifier. Replaces any pause already set.
    pub fn pause(mut self, pause: Pause) -> Self {
        self.pause = Some(pause);
        self
    }

    pub fn reaction(&self) -> &Reaction {
        &self.reaction
    }

    pub fn attempt_limit(&self) -> Option<u32> {
        self.reaction.attempt_limit()
    }

    pub fn has_modifier(&self) -> bool {
        self.modifier.is_some()
    }

    pub fn has_pause(&self) -> bool {
        self.pause.is_some()
    }

    /// Run the modifier (if any), resolve the reaction, then pause if it asked for a retry.
    pub(crate) fn run(&mut self, failure: &E, attempt: u32) -> Outcome {
        if let Some(modifier) = self.modifier.as_mut() {
            modifier.apply(failure, attempt);
        }
        let outcome = self.reaction.resolve(attempt);
        if let (Some(pause), Outcome::Continue) = (&self.pause, outcome) {
            pause.wait(attempt);
        }
        outcome
    }
}

impl<E> fmt::Debug for Link<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("modifier", &self.modifier)
            .field("pause", &self.pause)
            .field("reaction", &self.reaction)
            .finish()
    }
}

/// A failure category bound to an ordered chain of links.
pub struct Handler<'a, E> {
    category: Category<E>,
    links: Vec<Link<'a, E>>,
    on_select: Option<Box<dyn FnMut() + 'a>>,
}

impl<'a, E> Handler<'a, E> {
    /// Start building a handler for `category`.
    pub fn on(category: Category<E>) -> HandlerBuilder<'a, E> {
        HandlerBuilder::new(category)
    }

    /// Category this handler was registered for.
    pub fn category(&self) -> &Category<E> {
        &self.category
    }

    /// Links in fold order.
    pub fn links(&self) -> &[Link<'a, E>] {
        &self.links
    }

    /// True when this handler's category accepts `failure`.
    pub fn matches(&self, failure: &E) -> bool {
        self.category.matches(failure)
    }

    pub(crate) fn links_mut(&mut self) -> &mut [Link<'a, E>] {
        &mut self.links
    }

    pub(crate) fn selected(&mut self) {
        if let Some(callback) = self.on_select.as_mut() {
            callback();
        }
    }
}

impl<E> fmt::Debug for Handler<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("category", &self.category)
            .field("links", &self.links)
            .field("on_select", &self.on_select.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

/// Builder for [`Handler`]. Links are appended in order and never modified afterwards.
pub struct HandlerBuilder<'a, E> {
    category: Category<E>,
    links: Vec<Link<'a, E>>,
    on_select: Option<Box<dyn FnMut() + 'a>>,
}

impl<'a, E> HandlerBuilder<'a, E> {
    pub fn new(category: Category<E>) -> Self {
        Self { category, links: Vec::new(), on_select: None }
    }

    /// Append a link.
    pub fn link(mut self, link: Link<'a, E>) -> Self {
        self.links.push(link);
        self
    }

    pub fn retry(self, limit: u32) -> Self {
        self.link(Link::retry(limit))
    }

    pub fn retry_then(self, limit: u32, fallback: Reaction) -> Self {
        self.link(Link::retry_then(limit, fallback))
    }

    pub fn suppress(self) -> Self {
        self.link(Link::suppress())
    }

    pub fn unwind(self) -> Self {
        self.link(Link::unwind())
    }

    pub fn stop(self) -> Self {
        self.link(Link::stop())
    }

    pub fn propagate(self) -> Self {
        self.link(Link::propagate())
    }

    /// Callback fired each time this handler is selected for a failure, before its chain folds.
    pub fn on_select<F>(mut self, callback: F) -> Self
    where
        F: FnMut() + 'a,
    {
        self.on_select = Some(Box::new(callback));
        self
    }

    /// Finalize the handler. An empty chain becomes a single `Suppress` link.
    pub fn build(self) -> Handler<'a, E> {
        let mut links = self.links;
        if links.is_empty() {
            links.push(Link::suppress());
        }
        Handler { category: self.category, links, on_select: self.on_select }
    }
}

impl<'a, E> From<HandlerBuilder<'a, E>> for Handler<'a, E> {
    fn from(builder: HandlerBuilder<'a, E>) -> Self {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Backoff, TrackingSleeper};
    use std::cell::{Cell, RefCell};
    use std::time::Duration;

    #[derive(Debug, PartialEq)]
    struct Boom(&'static str);

    #[test]
    fn empty_chain_normalizes_to_suppress() {
        let handler = Handler::<Boom>::on(Category::any()).build();
        assert_eq!(handler.links().len(), 1);
        assert_eq!(handler.links()[0].reaction(), &Reaction::Suppress);
        assert!(!handler.links()[0].has_modifier());
    }

    #[test]
    fn links_keep_registration_order() {
        let handler = Handler::<Boom>::on(Category::any()).retry(2).unwind().suppress().build();
        let reactions: Vec<_> = handler.links().iter().map(|l| l.reaction().clone()).collect();
        assert_eq!(reactions, vec![Reaction::retry(2), Reaction::Unwind, Reaction::Suppress]);
        assert_eq!(handler.links()[0].attempt_limit(), Some(2));
        assert_eq!(handler.links()[1].attempt_limit(), None);
    }

    #[test]
    fn modifier_runs_before_reaction_with_failure_and_attempt() {
        let seen = RefCell::new(Vec::new());
        let mut link = Link::retry(5).observe(|e: &Boom, attempt| {
            seen.borrow_mut().push(format!("{}@{}", e.0, attempt));
        });
        assert_eq!(link.run(&Boom("x"), 2), Outcome::Continue);
        assert_eq!(link.run(&Boom("y"), 5), Outcome::Propagate);
        drop(link);
        assert_eq!(seen.into_inner(), vec!["x@2".to_string(), "y@5".to_string()]);
    }

    #[test]
    fn later_modifier_replaces_earlier_one() {
        let first = Cell::new(0);
        let second = Cell::new(0);
        let mut link: Link<'_, Boom> = Link::suppress()
            .modify(|| first.set(first.get() + 1))
            .inspect(|_| second.set(second.get() + 1));
        link.run(&Boom("z"), 1);
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn pause_runs_after_modifier_and_keeps_it() {
        let hits = Cell::new(0);
        let sleeper = TrackingSleeper::new();
        let pause = Pause::new(Backoff::constant(Duration::from_millis(5)), sleeper.clone());
        let mut link: Link<'_, Boom> = Link::retry(3).modify(|| hits.set(hits.get() + 1)).pause(pause);
        assert!(link.has_modifier() && link.has_pause());

        assert_eq!(link.run(&Boom("a"), 1), Outcome::Continue);
        assert_eq!(link.run(&Boom("a"), 2), Outcome::Continue);
        assert_eq!(link.run(&Boom("a"), 3), Outcome::Propagate);
        drop(link);
        assert_eq!(hits.get(), 3);
        assert_eq!(sleeper.calls(), vec![Duration::from_millis(5); 2]);
    }

    #[test]
    fn modifier_set_after_pause_keeps_the_pause() {
        let hits = Cell::new(0);
        let sleeper = TrackingSleeper::new();
        let pause = Pause::new(Backoff::linear(Duration::from_millis(10)), sleeper.clone());
        let mut link: Link<'_, Boom> = Link::retry(2).pause(pause).inspect(|_| hits.set(hits.get() + 1));

        link.run(&Boom("a"), 1);
        link.run(&Boom("a"), 2);
        drop(link);
        assert_eq!(hits.get(), 2);
        assert_eq!(sleeper.calls(), vec![Duration::from_millis(10)]);
    }

    #[test]
    fn on_select_fires_per_selection() {
        let selected = Cell::new(0);
        let mut handler = Handler::<Boom>::on(Category::any())
            .on_select(|| selected.set(selected.get() + 1))
            .build();
        handler.selected();
        handler.selected();
        drop(handler);
        assert_eq!(selected.get(), 2);
    }

    #[test]
    fn matches_delegates_to_category() {
        let handler: Handler<'_, Boom> =
            Handler::on(Category::matching("boom-a", |e: &Boom| e.0 == "a")).into();
        assert!(handler.matches(&Boom("a")));
        assert!(!handler.matches(&Boom("b")));
    }
}
