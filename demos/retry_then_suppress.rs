//! Retry a flaky operation, then give up quietly.
//!
//! Shows a reaction chain where an exhausted retry budget is cancelled by a trailing
//! `suppress` link, and where cleanup runs in `finally` on every path.

use failsafe::prelude::*;
use std::cell::Cell;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Transient,
    Timeout,
    Fatal,
}

impl FailureKind for Kind {
    fn parent(self) -> Option<Self> {
        match self {
            Kind::Timeout => Some(Kind::Transient),
            Kind::Transient | Kind::Fatal => None,
        }
    }
}

#[derive(Debug)]
struct FetchError {
    kind: Kind,
    attempt: u32,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} on attempt {}", self.kind, self.attempt)
    }
}

impl std::error::Error for FetchError {}

impl Classified for FetchError {
    type Kind = Kind;

    fn kind(&self) -> Kind {
        self.kind
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    println!("=== Retry, then suppress ===\n");
    let attempts = Cell::new(0);
    let completion = Failsafe::run(|| {
        attempts.set(attempts.get() + 1);
        Err::<&str, _>(FetchError { kind: Kind::Timeout, attempt: attempts.get() })
    })
    .handle(
        Handler::on(Category::kind(Kind::Transient))
            .link(Link::retry(3).inspect(|e: &FetchError| println!("  retrying after {}", e)))
            .link(Link::suppress().modify(|| println!("  giving up, using cached value"))),
    )
    .handle(Handler::on(Category::kind(Kind::Fatal)).propagate())
    .finally(|| println!("  connection released"))
    .execute()?;
    println!("Completion: {:?}\n", completion);

    println!("=== Fatal failures propagate ===\n");
    let memory = MemorySink::new();
    let result = Failsafe::run(|| Err::<(), _>(FetchError { kind: Kind::Fatal, attempt: 1 }))
        .handle(Handler::on(Category::kind(Kind::Transient)).retry(3))
        .handle(Handler::on(Category::kind(Kind::Fatal)).propagate())
        .with_sink(memory.clone())
        .execute();
    println!("Result: {:?}", result);
    for event in memory.events() {
        println!("  - {}", event);
    }

    Ok(())
}
