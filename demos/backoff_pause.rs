//! Pauses between attempts.
//!
//! A `Pause` combines a backoff curve, jitter, and a sleeper. Attached to a retry link it
//! blocks only on attempts that will actually be retried.

use failsafe::prelude::*;
use failsafe::{presets, TrackingSleeper};
use std::cell::Cell;
use std::fmt;
use std::time::Duration;

#[derive(Debug)]
struct Busy;

impl fmt::Display for Busy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("resource busy")
    }
}

impl std::error::Error for Busy {}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== Exponential backoff with a real sleeper ===\n");
    let backoff = Backoff::exponential(Duration::from_millis(20)).with_max(Duration::from_millis(100))?;
    let pause = Pause::new(backoff, ThreadSleeper).with_jitter(Jitter::equal());
    let calls = Cell::new(0);
    let completion = Failsafe::run(|| {
        calls.set(calls.get() + 1);
        if calls.get() < 4 {
            Err(Busy)
        } else {
            Ok(calls.get())
        }
    })
    .handle(presets::retry_with_pause(Category::any(), 5, pause))
    .execute()?;
    println!("Completion: {:?}\n", completion);

    println!("=== Recording the schedule instead of sleeping ===\n");
    let sleeper = TrackingSleeper::new();
    let pause = Pause::new(Backoff::linear(Duration::from_millis(50)), sleeper.clone());
    let result = Failsafe::run(|| Err::<(), _>(Busy))
        .handle(presets::retry_with_pause(Category::any(), 4, pause))
        .execute();
    println!("Result: {:?}", result);
    for (i, delay) in sleeper.calls().iter().enumerate() {
        println!("  pause {}: {:?}", i + 1, delay);
    }

    Ok(())
}
