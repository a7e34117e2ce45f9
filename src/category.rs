//! Failure categories used to select a handler.
//!
//! A [`Category`] is a labelled predicate over the failure type. Subtype-inclusive matching
//! is expressed through [`FailureKind`]: a category built with [`Category::kind`] matches any
//! failure whose kind equals the requested kind or descends from it.
//!
//! ```rust
//! use failsafe::{Category, Classified, FailureKind};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Kind { Io, Timeout, Parse }
//!
//! impl FailureKind for Kind {
//!     fn parent(self) -> Option<Self> {
//!         match self {
//!             Kind::Timeout => Some(Kind::Io),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct Failure(Kind);
//!
//! impl Classified for Failure {
//!     type Kind = Kind;
//!     fn kind(&self) -> Kind { self.0 }
//! }
//!
//! let io = Category::<Failure>::kind(Kind::Io);
//! assert!(io.matches(&Failure(Kind::Timeout)));
//! assert!(!io.matches(&Failure(Kind::Parse)));
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Type-erased failure accepted by [`Category::is`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A node in a failure taxonomy.
pub trait FailureKind: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// The broader kind this one specializes, if any.
    fn parent(self) -> Option<Self>;

    /// True when `self` is `ancestor` or descends from it.
    fn is_a(self, ancestor: Self) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == ancestor {
                return true;
            }
            current = kind.parent();
        }
        false
    }
}

/// Failures that report their place in a [`FailureKind`] taxonomy.
pub trait Classified {
    type Kind: FailureKind;

    fn kind(&self) -> Self::Kind;
}

/// Labelled failure predicate.
pub struct Category<E> {
    label: Cow<'static, str>,
    predicate: Arc<dyn Fn(&E) -> bool + Send + Sync>,
}

impl<E> Category<E> {
    /// Matches every failure.
    pub fn any() -> Self {
        Self::matching("any", |_| true)
    }

    /// Matches failures accepted by `predicate`.
    pub fn matching<L, F>(label: L, predicate: F) -> Self
    where
        L: Into<Cow<'static, str>>,
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        Self { label: label.into(), predicate: Arc::new(predicate) }
    }

    /// True when `failure` belongs to this category.
    pub fn matches(&self, failure: &E) -> bool {
        (self.predicate)(failure)
    }

    /// Human-readable name, reported in telemetry.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<E> Category<E>
where
    E: Classified,
{
    /// Matches failures of `kind` or any of its descendants.
    pub fn kind(kind: E::Kind) -> Self {
        Self::matching(format!("{:?}", kind), move |failure: &E| failure.kind().is_a(kind))
    }
}

impl Category<BoxError> {
    /// Matches boxed failures whose concrete type is `T`.
    pub fn is<T>() -> Self
    where
        T: std::error::Error + 'static,
    {
        Self::matching(std::any::type_name::<T>(), |failure: &BoxError| {
            failure.downcast_ref::<T>().is_some()
        })
    }
}

impl<E> Clone for Category<E> {
    fn clone(&self) -> Self {
        Self { label: self.label.clone(), predicate: self.predicate.clone() }
    }
}

impl<E> fmt::Debug for Category<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Category")
            .field("label", &self.label)
            .field("predicate", &"<predicate>")
            .finish()
    }
}
