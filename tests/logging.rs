mod common;

use common::{Kind, TestFailure};
use failsafe::telemetry::{MemorySink, MulticastSink};
use failsafe::{Category, Failsafe, Handler};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone)]
struct SharedWriter(Arc<Mutex<Vec<u8>>>);

impl<'a> MakeWriter<'a> for SharedWriter {
    type Writer = SharedGuard;
    fn make_writer(&'a self) -> Self::Writer {
        SharedGuard(self.0.clone())
    }
}

struct SharedGuard(Arc<Mutex<Vec<u8>>>);
impl std::io::Write for SharedGuard {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut guard = self.0.lock().unwrap();
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn capture() -> (Arc<Mutex<Vec<u8>>>, tracing::subscriber::DefaultGuard) {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt()
        .with_writer(BoxMakeWriter::new(SharedWriter(buffer.clone())))
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}

fn logs(buffer: &Arc<Mutex<Vec<u8>>>) -> String {
    String::from_utf8(buffer.lock().unwrap().clone()).unwrap()
}

#[test]
fn default_sink_logs_every_event() {
    let (buffer, _guard) = capture();

    let result = Failsafe::run(|| Err::<(), _>(TestFailure::runtime("down")))
        .handle(Handler::on(Category::kind(Kind::Runtime)).retry(2))
        .execute();
    assert!(result.is_err());

    let logs = logs(&buffer);
    assert!(logs.contains("AttemptFailed(attempt=1)"));
    assert!(logs.contains("HandlerSelected(attempt=2, handler=0, category=Runtime)"));
    assert!(logs.contains("Resolved(attempt=2, outcome=propagate)"));
    assert!(logs.contains("handler propagated failure"), "propagation should warn");
}

#[test]
fn unhandled_failure_warns() {
    let (buffer, _guard) = capture();

    let _ = Failsafe::run(|| Err::<(), _>(TestFailure::new(Kind::Checked, "io"))).execute();

    let logs = logs(&buffer);
    assert!(logs.contains("WARN"));
    assert!(logs.contains("no handler matched failure"));
    assert!(logs.contains("Unhandled(attempt=1)"));
}

#[test]
fn custom_sink_replaces_event_logging_but_not_warnings() {
    let (buffer, _guard) = capture();
    let sink = MemorySink::new();

    let _ = Failsafe::run(|| Err::<(), _>(TestFailure::runtime("down")))
        .with_sink(MulticastSink::new(sink.clone(), failsafe::telemetry::NullSink))
        .execute();

    let logs = logs(&buffer);
    assert!(!logs.contains("failsafe_event"));
    assert!(logs.contains("no handler matched failure"));
    assert_eq!(sink.len(), 3);
}
