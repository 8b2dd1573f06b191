#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{Session, parse_script};
use core_config::Config;
use core_events::EditorId;
use core_state::EditorHost;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::Level;
use tracing::subscriber::with_default;
use tracing_subscriber::fmt::MakeWriter;

/// Parse and run `script` against a fresh session with default config.
pub fn run(script: &str) -> Session {
    run_with(Config::default(), script)
}

pub fn run_with(config: Config, script: &str) -> Session {
    let mut session = Session::new(config);
    let steps = parse_script(script).expect("script parses");
    session.run_script(steps).expect("script runs");
    session
}

pub fn active_text(session: &Session) -> String {
    let id = session.active_editor().expect("active editor");
    session.workspace.text(id).expect("editor text")
}

pub fn text_of(session: &Session, n: u64) -> String {
    session.workspace.text(EditorId(n)).expect("editor text")
}

pub fn open_count(session: &Session) -> usize {
    session.workspace.open_editors().len()
}

/// Log sink shared with a `tracing_subscriber` fmt layer.
#[derive(Clone)]
pub struct BufferWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

pub struct LockedWriter<'a> {
    guard: MutexGuard<'a, Vec<u8>>,
}

impl<'a> Write for LockedWriter<'a> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = LockedWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LockedWriter {
            guard: self.inner.lock().expect("log buffer poisoned"),
        }
    }
}

/// Run `f` under a TRACE-level fmt subscriber and return what it logged.
pub fn capture(f: impl FnOnce()) -> String {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let writer = BufferWriter {
        inner: buffer.clone(),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_target(true)
        .with_ansi(false)
        .without_time()
        .with_writer(writer)
        .finish();
    with_default(subscriber, f);
    let bytes = buffer.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}
