#![allow(clippy::unwrap_used)]

use std::{
    io::{self, Cursor},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use super::{
    Context, Event, EventKind, Key, KeyName, NoopTerminal, Prompt, PromptError, State, Terminal,
    Widget, track_key_value,
};
use crate::testing::{SharedOutput, press, scripted, type_text};

/// Minimal text widget: uppercases its value on finalize.
#[derive(Default)]
struct Echo {
    required: bool,
    finalized: Arc<AtomicUsize>,
}

impl Widget for Echo {
    type Value = String;

    fn init(&mut self) -> Context<String> {
        Context::new(String::new())
    }

    fn render(&self, ctx: &Context<String>) -> String {
        let status = match ctx.state {
            State::Initial | State::Active => "active",
            State::Error => "error",
            State::Submit => "submit",
            State::Cancel => "cancel",
        };
        let mut frame = format!("title\nvalue: {}\n{status}", ctx.value);
        if ctx.state == State::Error {
            frame.push('\n');
            frame.push_str(&ctx.error);
        }
        frame
    }

    fn handle_key(&mut self, ctx: &mut Context<String>, key: &Key) {
        let (value, cursor) = track_key_value(&ctx.value, ctx.cursor, key);
        ctx.value = value;
        ctx.cursor = cursor;
    }

    fn validate(&self, value: &String) -> Result<(), String> {
        if self.required && value.is_empty() {
            Err("empty".to_string())
        } else {
            Ok(())
        }
    }

    fn finalize(&mut self, ctx: &mut Context<String>) {
        self.finalized.fetch_add(1, Ordering::SeqCst);
        ctx.value = ctx.value.to_uppercase();
    }
}

/// Steps through fixed frames, one per key.
struct Frames(Vec<&'static str>);

impl Widget for Frames {
    type Value = usize;

    fn init(&mut self) -> Context<usize> {
        Context::new(0)
    }

    fn render(&self, ctx: &Context<usize>) -> String {
        self.0.get(ctx.value).copied().unwrap_or_default().to_string()
    }

    fn handle_key(&mut self, ctx: &mut Context<usize>, _key: &Key) {
        ctx.value = ctx.value.saturating_add(1);
    }
}

const SCREEN_COLS: u16 = 40;

/// Replays everything written so far on a 10x40 terminal.
fn screen(output: &SharedOutput) -> vt100::Parser {
    let mut parser = vt100::Parser::new(10, SCREEN_COLS, 0);
    parser.process(output.contents().as_bytes());
    parser
}

/// Non-empty screen rows, trailing blanks trimmed.
fn rows(parser: &vt100::Parser) -> Vec<String> {
    let mut rows: Vec<String> = parser
        .screen()
        .rows(0, SCREEN_COLS)
        .map(|row| row.trim_end().to_string())
        .collect();
    while rows.last().is_some_and(String::is_empty) {
        rows.pop();
    }
    rows
}

/// Renders every frame in turn and returns the final screen.
fn play(frames: &[&'static str]) -> vt100::Parser {
    let (mut prompt, output) = scripted(Frames(frames.to_vec()));
    for _ in 1..frames.len() {
        press(&mut prompt, &[KeyName::Tab]);
    }
    assert_eq!(prompt.frame(), frames.last().copied().unwrap_or_default());
    screen(&output)
}

#[derive(Clone, Default)]
struct RecordingTerminal {
    calls: Arc<Mutex<Vec<&'static str>>>,
    fail: bool,
}

impl Terminal for RecordingTerminal {
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        if self.fail {
            return Err(io::Error::other("not a tty"));
        }
        self.calls.lock().unwrap().push("enable");
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> io::Result<()> {
        self.calls.lock().unwrap().push("disable");
        Ok(())
    }
}

#[test]
fn test_first_render_hides_cursor_and_writes_frame() {
    let output = SharedOutput::default();
    let mut prompt = Prompt::new(Echo::default())
        .with_output(output.clone())
        .with_terminal(NoopTerminal);

    assert_eq!(prompt.context().state, State::Initial);
    prompt.render().unwrap();

    assert_eq!(prompt.context().state, State::Active);
    let written = output.contents();
    assert!(written.starts_with("\x1b[?25l"));
    assert!(written.contains("title\r\nvalue: \r\nactive"));
}

#[test]
fn test_rendering_same_frame_twice_writes_nothing() {
    let (mut prompt, output) = scripted(Echo::default());
    let before = output.len();

    prompt.render().unwrap();
    prompt.render().unwrap();

    assert_eq!(output.len(), before);
}

#[test]
fn test_single_changed_line_is_rewritten_alone() {
    let (mut prompt, output) = scripted(Echo::default());
    output.clear();

    type_text(&mut prompt, "x");

    let written = output.contents();
    assert!(written.contains("value: x"));
    assert!(!written.contains("title"));
    assert!(!written.contains("active"));
    // Clear current line, not everything below
    assert!(written.contains("\x1b[2K"));
    assert!(!written.contains("\x1b[J"));
}

#[test]
fn test_multiple_changed_lines_rewrite_tail() {
    let (mut prompt, output) = scripted(Echo {
        required: true,
        ..Echo::default()
    });
    output.clear();

    press(&mut prompt, &[KeyName::Enter]);

    let written = output.contents();
    assert!(written.contains("\x1b[J"));
    assert!(written.contains("error\r\nempty"));
    assert!(!written.contains("title"));
}

#[test]
fn test_screen_after_frame_grows() {
    let parser = play(&["a", "a\nb\nc"]);

    assert_eq!(rows(&parser), ["a", "b", "c"]);
    assert_eq!(parser.screen().cursor_position(), (2, 1));
}

#[test]
fn test_screen_after_frame_shrinks() {
    let parser = play(&["a\nb\nc", "a"]);

    assert_eq!(rows(&parser), ["a"]);
    assert_eq!(parser.screen().cursor_position(), (0, 1));
}

#[test]
fn test_screen_edit_after_shrink_hits_right_row() {
    let parser = play(&["a\nb\nc", "a\nb", "a\nX"]);

    assert_eq!(rows(&parser), ["a", "X"]);
    assert_eq!(parser.screen().cursor_position(), (1, 1));
}

#[test]
fn test_screen_edit_after_grow_and_middle_rewrite() {
    let parser = play(&["one\ntwo", "one\ntwo\nthree", "one\nTWO\nthree", "uno\ntres"]);

    assert_eq!(rows(&parser), ["uno", "tres"]);
    assert_eq!(parser.screen().cursor_position(), (1, 4));
}

#[test]
fn test_screen_after_submit_matches_final_frame() {
    let (mut prompt, output) = scripted(Echo::default());

    type_text(&mut prompt, "ok");
    press(&mut prompt, &[KeyName::Enter]);

    let parser = screen(&output);
    assert_eq!(rows(&parser), ["title", "value: OK", "submit"]);
    // Parked below the frame
    assert_eq!(parser.screen().cursor_position(), (3, 0));
}

#[test]
fn test_validation_error_keeps_prompt_interactive() {
    let (mut prompt, _) = scripted(Echo {
        required: true,
        ..Echo::default()
    });
    let errors = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&errors);
    prompt.on(EventKind::Error, move |_, event| {
        if let Event::Error(message) = event {
            seen.lock().unwrap().push((*message).to_string());
        }
    });

    press(&mut prompt, &[KeyName::Enter]);
    assert_eq!(prompt.context().state, State::Error);
    assert_eq!(prompt.context().error, "empty");
    assert_eq!(*errors.lock().unwrap(), vec!["empty".to_string()]);

    type_text(&mut prompt, "a");
    assert_eq!(prompt.context().state, State::Active);

    press(&mut prompt, &[KeyName::Enter]);
    assert_eq!(prompt.context().state, State::Submit);
}

#[test]
fn test_cancel_wins_over_error_state() {
    let (mut prompt, _) = scripted(Echo {
        required: true,
        ..Echo::default()
    });

    press(&mut prompt, &[KeyName::Enter]);
    assert_eq!(prompt.context().state, State::Error);

    press(&mut prompt, &[KeyName::Cancel]);
    assert_eq!(prompt.context().state, State::Cancel);
}

#[test]
fn test_finalize_fires_once_before_terminal_render() {
    let finalized = Arc::new(AtomicUsize::new(0));
    let (mut prompt, output) = scripted(Echo {
        finalized: Arc::clone(&finalized),
        ..Echo::default()
    });
    let order = Arc::new(Mutex::new(Vec::new()));
    for (kind, label) in [
        (EventKind::Finalize, "finalize"),
        (EventKind::Submit, "submit"),
        (EventKind::Cancel, "cancel"),
    ] {
        let order = Arc::clone(&order);
        prompt.on(kind, move |_, _| order.lock().unwrap().push(label));
    }

    type_text(&mut prompt, "ok");
    press(&mut prompt, &[KeyName::Enter, KeyName::Enter, KeyName::Cancel]);

    assert_eq!(finalized.load(Ordering::SeqCst), 1);
    assert_eq!(*order.lock().unwrap(), vec!["finalize", "submit"]);
    // The terminal frame already shows the normalized value
    assert!(output.contents().contains("value: OK"));
    assert!(prompt.frame().contains("submit"));
}

#[test]
fn test_cursor_event_reports_new_index() {
    let (mut prompt, _) = scripted(Echo::default());
    let cursors = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&cursors);
    prompt.on(EventKind::Cursor, move |_, event| {
        if let Event::Cursor(idx) = event {
            seen.lock().unwrap().push(*idx);
        }
    });

    type_text(&mut prompt, "ab");
    press(&mut prompt, &[KeyName::Home, KeyName::Home]);

    assert_eq!(*cursors.lock().unwrap(), vec![1, 2, 0]);
}

#[test]
fn test_key_listener_can_mutate_context() {
    let (mut prompt, _) = scripted(Echo::default());
    prompt.on(EventKind::Key, |ctx, event| {
        if let Event::Key(key) = event
            && key.name == KeyName::Tab
        {
            ctx.value = "completed".to_string();
        }
    });

    press(&mut prompt, &[KeyName::Tab]);
    assert_eq!(prompt.context().value, "completed");
}

#[test]
fn test_run_returns_finalized_value() {
    let output = SharedOutput::default();
    let value = Prompt::new(Echo::default())
        .with_input(Cursor::new(b"hi\r".to_vec()))
        .with_output(output.clone())
        .with_terminal(NoopTerminal)
        .run()
        .unwrap();

    assert_eq!(value, "HI");
    let written = output.contents();
    assert!(written.ends_with("\r\n\x1b[?25h"));
    assert_eq!(written.matches("\x1b[?25h").count(), 1);
}

#[test]
fn test_run_reports_cancellation() {
    let err = Prompt::new(Echo::default())
        .with_input(Cursor::new(b"abc\x03".to_vec()))
        .with_output(SharedOutput::default())
        .with_terminal(NoopTerminal)
        .run()
        .unwrap_err();

    assert!(err.is_cancelled());
}

#[test]
fn test_run_end_of_input_is_io_error() {
    let err = Prompt::new(Echo::default())
        .with_input(Cursor::new(b"abc".to_vec()))
        .with_output(SharedOutput::default())
        .with_terminal(NoopTerminal)
        .run()
        .unwrap_err();

    assert!(matches!(err, PromptError::Io(_)));
    assert!(!err.is_cancelled());
}

#[test]
fn test_run_restores_raw_mode() {
    let terminal = RecordingTerminal::default();
    let calls = Arc::clone(&terminal.calls);

    let _ = Prompt::new(Echo::default())
        .with_input(Cursor::new(b"\x03".to_vec()))
        .with_output(SharedOutput::default())
        .with_terminal(terminal)
        .run();

    assert_eq!(*calls.lock().unwrap(), vec!["enable", "disable"]);
}

#[test]
fn test_raw_mode_failure_is_fatal() {
    let output = SharedOutput::default();
    let err = Prompt::new(Echo::default())
        .with_input(Cursor::new(b"ok\r".to_vec()))
        .with_output(output.clone())
        .with_terminal(RecordingTerminal {
            fail: true,
            ..RecordingTerminal::default()
        })
        .run()
        .unwrap_err();

    assert!(matches!(err, PromptError::Terminal(_)));
    assert_eq!(output.len(), 0);
}

#[test]
fn test_keys_after_submit_are_ignored() {
    let (mut prompt, output) = scripted(Echo::default());
    press(&mut prompt, &[KeyName::Enter]);
    let written = output.len();

    type_text(&mut prompt, "late");

    assert_eq!(prompt.context().value, "");
    assert_eq!(output.len(), written);
}
