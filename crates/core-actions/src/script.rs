//! Replay scripts: a line-oriented description of host activity.
//!
//! One step per line; blank lines and `#` comments are skipped. Text
//! arguments run to the end of the line and understand `\n`, `\t` and `\\`.
//!
//! ```text
//! open notes abc\ndef
//! cursor 0 1
//! command overtype-mode:toggle
//! type XY
//! ```
//!
//! Parsing is pure; `Session::run_step` performs the side effects.

use anyhow::Result;
use core_events::{CommandEvent, EditorId, Event, InsertOrigin, MouseButton, ServiceEvent};
use core_text::{Position, grapheme};
use thiserror::Error;
use tracing::debug;

use crate::{DispatchResult, Session, dispatch};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("line {line}: unknown step `{word}`")]
    UnknownStep { line: usize, word: String },
    #[error("line {line}: usage: {usage}")]
    Usage { line: usize, usage: &'static str },
    #[error("line {line}: `{value}` is not a number")]
    InvalidNumber { line: usize, value: String },
    #[error("line {line}: unknown command `{name}`")]
    UnknownCommand { line: usize, name: String },
}

impl ScriptError {
    pub fn line(&self) -> usize {
        match self {
            ScriptError::UnknownStep { line, .. }
            | ScriptError::Usage { line, .. }
            | ScriptError::InvalidNumber { line, .. }
            | ScriptError::UnknownCommand { line, .. } => *line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Open { name: String, text: String },
    Cursors(Vec<Position>),
    Select { anchor: Position, head: Position },
    /// Typed text, delivered one grapheme per keystroke.
    Type(String),
    Undo,
    Redo,
    Set { key: String, value: String },
    /// Anything that maps directly onto a dispatcher event.
    Event(Event),
}

pub fn parse_script(src: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (idx, raw) in src.lines().enumerate() {
        let line = raw.trim_end();
        let body = line.trim_start();
        if body.is_empty() || body.starts_with('#') {
            continue;
        }
        steps.push(parse_line(idx + 1, body)?);
    }
    Ok(steps)
}

fn parse_line(line: usize, body: &str) -> Result<Step, ScriptError> {
    let (word, rest) = match body.split_once(' ') {
        Some((w, r)) => (w, r),
        None => (body, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();
    let usage = |usage: &'static str| ScriptError::Usage { line, usage };

    let step = match word {
        "open" => {
            let (name, text) = match rest.split_once(' ') {
                Some((n, t)) => (n, t),
                None => (rest, ""),
            };
            if name.is_empty() {
                return Err(usage("open <name> [text]"));
            }
            Step::Open {
                name: name.to_string(),
                text: unescape(text),
            }
        }
        "focus" | "close" => {
            let [n] = args[..] else {
                return Err(usage("focus|close <editor>"));
            };
            let id = EditorId(number(line, n)? as u64);
            if word == "focus" {
                Step::Event(Event::EditorFocused(id))
            } else {
                Step::Event(Event::EditorClosed(id))
            }
        }
        "cursor" => {
            if args.is_empty() || args.len() % 2 != 0 {
                return Err(usage("cursor <line> <byte> [<line> <byte> ...]"));
            }
            let positions = args
                .chunks(2)
                .map(|pair| Ok(Position::new(number(line, pair[0])?, number(line, pair[1])?)))
                .collect::<Result<Vec<_>, ScriptError>>()?;
            Step::Cursors(positions)
        }
        "select" => {
            let [al, ab, hl, hb] = args[..] else {
                return Err(usage("select <line> <byte> <line> <byte>"));
            };
            Step::Select {
                anchor: Position::new(number(line, al)?, number(line, ab)?),
                head: Position::new(number(line, hl)?, number(line, hb)?),
            }
        }
        "type" => Step::Type(unescape(rest)),
        "compose" => input(rest, InsertOrigin::Composition),
        "paste" => input(rest, InsertOrigin::Paste),
        "complete" => input(rest, InsertOrigin::Autocomplete),
        "snippet" => input(rest, InsertOrigin::Snippet),
        "command" => {
            let [name] = args[..] else {
                return Err(usage("command <name>"));
            };
            let cmd = CommandEvent::from_name(name).ok_or_else(|| ScriptError::UnknownCommand {
                line,
                name: name.to_string(),
            })?;
            Step::Event(Event::Command(cmd))
        }
        "click" => {
            let button = match args[..] {
                ["left"] => MouseButton::Left,
                ["right"] => MouseButton::Right,
                ["middle"] => MouseButton::Middle,
                _ => return Err(usage("click left|right|middle")),
            };
            Step::Event(Event::IndicatorClick(button))
        }
        "statusbar" => {
            let service = match args[..] {
                ["on"] => ServiceEvent::Provided,
                ["off"] => ServiceEvent::Withdrawn,
                _ => return Err(usage("statusbar on|off")),
            };
            Step::Event(Event::StatusBar(service))
        }
        "set" => {
            let [key, value] = args[..] else {
                return Err(usage("set <key> <value>"));
            };
            Step::Set {
                key: key.to_string(),
                value: value.to_string(),
            }
        }
        "undo" | "redo" | "activate" | "deactivate" | "quit" if !args.is_empty() => {
            return Err(usage("step takes no arguments"));
        }
        "undo" => Step::Undo,
        "redo" => Step::Redo,
        "activate" => Step::Event(Event::Activate),
        "deactivate" => Step::Event(Event::Deactivate),
        "quit" => Step::Event(Event::Shutdown),
        other => {
            return Err(ScriptError::UnknownStep {
                line,
                word: other.to_string(),
            });
        }
    };
    Ok(step)
}

fn input(rest: &str, origin: InsertOrigin) -> Step {
    Step::Event(Event::Input {
        text: unescape(rest),
        origin,
    })
}

fn number(line: usize, value: &str) -> Result<usize, ScriptError> {
    value.parse().map_err(|_| ScriptError::InvalidNumber {
        line,
        value: value.to_string(),
    })
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

impl Session {
    /// Perform one script step.
    pub fn run_step(&mut self, step: Step) -> Result<DispatchResult> {
        let result = match step {
            Step::Open { name, text } => {
                self.open_editor(&name, &text)?;
                DispatchResult::dirty()
            }
            Step::Cursors(positions) => DispatchResult::from_dirty(self.set_cursors(&positions)),
            Step::Select { anchor, head } => DispatchResult::from_dirty(self.select(anchor, head)),
            Step::Type(text) => {
                let mut result = DispatchResult::clean();
                for g in grapheme::iter(&text) {
                    let r = dispatch(
                        Event::Input {
                            text: g.to_string(),
                            origin: InsertOrigin::Keystroke,
                        },
                        self,
                    );
                    result.dirty |= r.dirty;
                }
                result
            }
            Step::Undo => DispatchResult::from_dirty(self.undo()),
            Step::Redo => DispatchResult::from_dirty(self.redo()),
            Step::Set { key, value } => match self.config.set(&key, &value)? {
                Some(change) => dispatch(Event::ConfigChanged(change), self),
                None => DispatchResult::clean(),
            },
            Step::Event(event) => dispatch(event, self),
        };
        Ok(result)
    }

    /// Run steps in order until one quits. Returns whether a quit was seen.
    pub fn run_script(&mut self, steps: Vec<Step>) -> Result<bool> {
        for (idx, step) in steps.into_iter().enumerate() {
            if self.run_step(step)?.quit {
                debug!(target: "runtime", step = idx + 1, "script_quit");
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_skips_comments_and_blanks() {
        let steps = parse_script("# header\n\n  undo\n").unwrap();
        assert_eq!(steps, vec![Step::Undo]);
    }

    #[test]
    fn parse_open_with_escapes() {
        let steps = parse_script("open notes ab\\ncd\\\\x").unwrap();
        assert_eq!(
            steps,
            vec![Step::Open {
                name: "notes".into(),
                text: "ab\ncd\\x".into()
            }]
        );
    }

    #[test]
    fn parse_open_without_text() {
        let steps = parse_script("open empty").unwrap();
        assert_eq!(
            steps,
            vec![Step::Open {
                name: "empty".into(),
                text: String::new()
            }]
        );
    }

    #[test]
    fn parse_cursors() {
        let steps = parse_script("cursor 0 1 2 3").unwrap();
        assert_eq!(
            steps,
            vec![Step::Cursors(vec![Position::new(0, 1), Position::new(2, 3)])]
        );
    }

    #[test]
    fn parse_type_keeps_inner_spaces() {
        let steps = parse_script("type a  b").unwrap();
        assert_eq!(steps, vec![Step::Type("a  b".into())]);
    }

    #[test]
    fn parse_origins() {
        let steps = parse_script("paste x\ncomplete y\nsnippet z\ncompose w").unwrap();
        let origins: Vec<_> = steps
            .iter()
            .map(|s| match s {
                Step::Event(Event::Input { origin, .. }) => *origin,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            origins,
            vec![
                InsertOrigin::Paste,
                InsertOrigin::Autocomplete,
                InsertOrigin::Snippet,
                InsertOrigin::Composition
            ]
        );
    }

    #[test]
    fn parse_commands_and_services() {
        let steps = parse_script(
            "command overtype-mode:toggle\ncommand overtype-mode:toggle-all\nstatusbar on\nclick left\nquit",
        )
        .unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Event(Event::Command(CommandEvent::ToggleActive)),
                Step::Event(Event::Command(CommandEvent::ToggleAll)),
                Step::Event(Event::StatusBar(ServiceEvent::Provided)),
                Step::Event(Event::IndicatorClick(MouseButton::Left)),
                Step::Event(Event::Shutdown),
            ]
        );
    }

    #[test]
    fn errors_carry_line_numbers() {
        let err = parse_script("undo\n\nbogus 1").unwrap_err();
        assert_eq!(
            err,
            ScriptError::UnknownStep {
                line: 3,
                word: "bogus".into()
            }
        );
        assert_eq!(err.line(), 3);
        assert_eq!(err.to_string(), "line 3: unknown step `bogus`");
    }

    #[test]
    fn argument_errors() {
        assert!(matches!(
            parse_script("cursor 1").unwrap_err(),
            ScriptError::Usage { line: 1, .. }
        ));
        assert!(matches!(
            parse_script("cursor a 1").unwrap_err(),
            ScriptError::InvalidNumber { line: 1, .. }
        ));
        assert!(matches!(
            parse_script("command nope").unwrap_err(),
            ScriptError::UnknownCommand { line: 1, .. }
        ));
        assert!(matches!(
            parse_script("click double").unwrap_err(),
            ScriptError::Usage { .. }
        ));
        assert!(matches!(
            parse_script("undo now").unwrap_err(),
            ScriptError::Usage { .. }
        ));
    }
}
