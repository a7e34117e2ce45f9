use failsafe::{Classified, FailureKind};
use std::fmt;

/// Small failure taxonomy for tests:
/// `Any` > `Runtime` > { `IllegalState`, `IllegalArgument` }, and `Any` > `Checked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Kind {
    Any,
    Checked,
    Runtime,
    IllegalState,
    IllegalArgument,
}

impl FailureKind for Kind {
    fn parent(self) -> Option<Self> {
        match self {
            Kind::Any => None,
            Kind::Checked | Kind::Runtime => Some(Kind::Any),
            Kind::IllegalState | Kind::IllegalArgument => Some(Kind::Runtime),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestFailure {
    pub kind: Kind,
    pub message: String,
}

#[allow(dead_code)]
impl TestFailure {
    pub fn new(kind: Kind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(Kind::Runtime, message)
    }
}

impl fmt::Display for TestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for TestFailure {}

impl Classified for TestFailure {
    type Kind = Kind;

    fn kind(&self) -> Kind {
        self.kind
    }
}
