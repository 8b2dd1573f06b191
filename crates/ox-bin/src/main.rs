//! Overtype entrypoint: replay a host script against the reference editor
//! host and print the resulting buffers and status line.
use anyhow::{Context, Result};
use clap::Parser;
use core_actions::{Session, dispatch, parse_script};
use core_config::load_from;
use core_events::{Event, ServiceEvent, TracingEventHooks};
use core_state::EditorHost;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "overtype.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "overtype", version, about = "Overtype mode replay host")]
struct Args {
    /// Replay script to run. Reads standard input when omitted or `-`.
    pub script: Option<PathBuf>,
    /// Files to open as editors before the script runs.
    #[arg(long = "open", value_name = "FILE")]
    pub open: Vec<PathBuf>,
    /// Optional configuration file path (overrides discovery of `overtype.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Start without a status bar service.
    #[arg(long = "no-status-bar")]
    pub no_status_bar: bool,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global tracing subscriber already installed; drop guard so writer shuts down.
            }
        }

        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

fn read_script(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("reading script {}", p.display())),
        _ => std::io::read_to_string(std::io::stdin()).context("reading script from stdin"),
    }
}

/// Build a session, open the startup files and replay `script`.
fn run_session(args: &Args, script: &str) -> Result<Session> {
    let config = load_from(args.config.clone())?;
    let mut session = Session::new(config).with_hooks(Box::new(TracingEventHooks));
    if !args.no_status_bar {
        dispatch(Event::StatusBar(ServiceEvent::Provided), &mut session);
    }
    for path in &args.open {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("opening {}", path.display()))?;
        let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("file");
        session.open_editor(name, &content)?;
    }

    let steps = parse_script(script)?;
    let step_count = steps.len();
    let quit = session.run_script(steps)?;
    info!(target: "runtime", steps = step_count, quit, editors = session.workspace.len(), "script_complete");
    Ok(session)
}

/// Final buffers, one block per editor, then the status line when present.
fn render_report(session: &Session) -> String {
    let mut out = String::new();
    for id in session.workspace.open_editors() {
        let Some(editor) = session.workspace.editor(id) else {
            continue;
        };
        let mode = if session.overtype.is_overtype(id) {
            "overtype"
        } else {
            "insert"
        };
        let _ = writeln!(out, "== {} {} ({mode}) ==", id, editor.buffer().name);
        out.push_str(&editor.text());
        if !out.ends_with('\n') {
            out.push('\n');
        }
    }
    if let Some(line) = session.status_line() {
        let _ = writeln!(out, "status: {line}");
    }
    out
}

fn main() -> Result<()> {
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let script = read_script(args.script.as_deref())?;
    let session = match run_session(&args, &script) {
        Ok(s) => s,
        Err(e) => {
            error!(target: "runtime", error = %e, "script_failed");
            return Err(e);
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(render_report(&session).as_bytes())?;
    stdout.flush()?;
    info!(target: "runtime", "shutdown");
    Ok(())
}
