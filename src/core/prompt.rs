//! The generic prompt engine.
//!
//! A [`Prompt`] owns the widget, the value/cursor/state [`Context`], the
//! listener registry and the terminal streams. Each keystroke is decoded,
//! dispatched, rendered and settled before the next one is read.

use std::{
    io::{self, Read, Write},
    mem,
    sync::mpsc,
    thread,
};

use crossterm::{
    cursor, queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use log::{debug, trace, warn};

use super::{
    diff::diff_lines,
    error::PromptError,
    events::{Event, EventEmitter, EventKind, ListenerHandle},
    key::{Key, KeyName, KeyReader},
    terminal::{CrosstermTerminal, NoopTerminal, RawMode, Terminal},
};

/// Lifecycle of a prompt run.
///
/// `Initial -> Active <-> Error -> Submit | Cancel`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Initial,
    Active,
    Error,
    Submit,
    Cancel,
}

impl State {
    /// Submit and Cancel end the input loop.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Submit | Self::Cancel)
    }
}

/// The engine-owned part of a prompt that widgets read and mutate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context<V> {
    pub value: V,
    pub cursor: usize,
    pub state: State,
    /// Last validation message. Only meaningful while `state` is `Error`.
    pub error: String,
}

impl<V> Context<V> {
    #[must_use]
    pub fn new(value: V) -> Self {
        Self {
            value,
            cursor: 0,
            state: State::Initial,
            error: String::new(),
        }
    }

    #[must_use]
    pub fn with_cursor(mut self, cursor: usize) -> Self {
        self.cursor = cursor;
        self
    }
}

/// Widget-specific behavior plugged into the engine.
pub trait Widget: Send {
    type Value: Send;

    /// Builds the starting context. Called once, when the prompt is created.
    fn init(&mut self) -> Context<Self::Value>;

    /// Produces the full frame. Must not write to the terminal.
    fn render(&self, ctx: &Context<Self::Value>) -> String;

    /// Handles every key except Enter and Cancel, which the engine owns.
    fn handle_key(&mut self, ctx: &mut Context<Self::Value>, key: &Key);

    /// Checked on Enter. `Err` keeps the prompt open with the message shown.
    fn validate(&self, _value: &Self::Value) -> Result<(), String> {
        Ok(())
    }

    /// Last chance to normalize the value before the terminal render.
    fn finalize(&mut self, _ctx: &mut Context<Self::Value>) {}
}

/// Drives a [`Widget`] against a terminal.
pub struct Prompt<W: Widget> {
    widget: W,
    ctx: Context<W::Value>,
    events: EventEmitter<Context<W::Value>>,
    input: Box<dyn Read + Send>,
    output: Box<dyn Write + Send>,
    terminal: Box<dyn Terminal>,
    frame: String,
    finalized: bool,
}

impl<W: Widget> Prompt<W> {
    /// Creates a prompt bound to stdin, stdout and the process terminal.
    #[must_use]
    pub fn new(mut widget: W) -> Self {
        let ctx = widget.init();
        Self {
            widget,
            ctx,
            events: EventEmitter::new(),
            input: Box::new(io::stdin()),
            output: Box::new(io::stdout()),
            terminal: Box::new(CrosstermTerminal),
            frame: String::new(),
            finalized: false,
        }
    }

    #[must_use]
    pub fn with_input<R: Read + Send + 'static>(mut self, input: R) -> Self {
        self.input = Box::new(input);
        self
    }

    #[must_use]
    pub fn with_output<O: Write + Send + 'static>(mut self, output: O) -> Self {
        self.output = Box::new(output);
        self
    }

    #[must_use]
    pub fn with_terminal<T: Terminal + 'static>(mut self, terminal: T) -> Self {
        self.terminal = Box::new(terminal);
        self
    }

    pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerHandle
    where
        F: FnMut(&mut Context<W::Value>, &Event<'_>) + Send + 'static,
    {
        self.events.on(kind, listener)
    }

    pub fn once<F>(&self, kind: EventKind, listener: F) -> ListenerHandle
    where
        F: FnMut(&mut Context<W::Value>, &Event<'_>) + Send + 'static,
    {
        self.events.once(kind, listener)
    }

    pub fn off(&self, handle: ListenerHandle) -> bool {
        self.events.off(handle)
    }

    #[must_use]
    pub fn context(&self) -> &Context<W::Value> {
        &self.ctx
    }

    #[must_use]
    pub fn widget(&self) -> &W {
        &self.widget
    }

    /// The last frame written to the output.
    #[must_use]
    pub fn frame(&self) -> &str {
        &self.frame
    }

    /// Runs the prompt until the user submits or cancels.
    ///
    /// The input loop runs on its own scoped thread; the caller blocks until
    /// that thread signals completion by dropping its end of the channel.
    pub fn run(self) -> Result<W::Value, PromptError> {
        let (done, finished) = mpsc::channel::<()>();

        thread::scope(|scope| {
            let worker = scope.spawn(move || {
                let _done = done;
                self.run_loop()
            });

            // Err here only means the sender was dropped, which is the signal.
            let _ = finished.recv();

            worker
                .join()
                .unwrap_or_else(|_| Err(PromptError::Interrupted))
        })
    }

    fn run_loop(mut self) -> Result<W::Value, PromptError> {
        let terminal = mem::replace(&mut self.terminal, Box::new(NoopTerminal));
        let _raw = RawMode::enter(terminal).map_err(PromptError::Terminal)?;

        let input = mem::replace(&mut self.input, Box::new(io::empty()));
        let mut keys = KeyReader::new(input);

        let outcome = self.drive(&mut keys);

        if let Err(e) = queue!(self.output, cursor::Show).and_then(|()| self.output.flush()) {
            warn!("unable to restore cursor: {e}");
        }

        outcome?;

        match self.ctx.state {
            State::Submit => Ok(self.ctx.value),
            _ => Err(PromptError::Cancelled),
        }
    }

    fn drive<R: Read>(&mut self, keys: &mut KeyReader<R>) -> Result<(), PromptError> {
        self.render().map_err(PromptError::Io)?;

        while !self.ctx.state.is_terminal() {
            let key = keys.read_key().map_err(PromptError::Io)?;
            self.press_key(&key).map_err(PromptError::Io)?;
        }

        Ok(())
    }

    /// Processes one key: state transition, dispatch, then render.
    ///
    /// Keys pressed after a terminal state are ignored.
    pub fn press_key(&mut self, key: &Key) -> io::Result<()> {
        if self.ctx.state.is_terminal() {
            return Ok(());
        }

        if self.ctx.state == State::Error {
            self.ctx.state = State::Active;
        }

        let cursor = self.ctx.cursor;

        match key.name {
            KeyName::Cancel => self.ctx.state = State::Cancel,
            KeyName::Enter => self.submit(),
            _ => {
                self.widget.handle_key(&mut self.ctx, key);
                self.events.emit(&mut self.ctx, &Event::Key(key));
            }
        }

        if self.ctx.cursor != cursor {
            let moved = self.ctx.cursor;
            self.events.emit(&mut self.ctx, &Event::Cursor(moved));
        }

        if self.ctx.state.is_terminal() {
            self.finalize();
        }

        self.render()?;

        match self.ctx.state {
            State::Submit => self.events.emit(&mut self.ctx, &Event::Submit),
            State::Cancel => self.events.emit(&mut self.ctx, &Event::Cancel),
            _ => {}
        }

        Ok(())
    }

    fn submit(&mut self) {
        match self.widget.validate(&self.ctx.value) {
            Ok(()) => {
                debug!("prompt submitted");
                self.ctx.state = State::Submit;
            }
            Err(message) => {
                debug!("validation failed: {message}");
                self.ctx.error.clone_from(&message);
                self.ctx.state = State::Error;
                self.events.emit(&mut self.ctx, &Event::Error(&message));
            }
        }
    }

    fn finalize(&mut self) {
        if mem::replace(&mut self.finalized, true) {
            return;
        }
        self.widget.finalize(&mut self.ctx);
        self.events.emit(&mut self.ctx, &Event::Finalize);
    }

    /// Renders the widget and writes only what changed since the last frame.
    ///
    /// The first render hides the cursor and writes the whole frame.
    pub fn render(&mut self) -> io::Result<()> {
        let frame = self.widget.render(&self.ctx);

        if self.ctx.state == State::Initial {
            queue!(self.output, cursor::Hide, Print(frame.replace('\n', "\r\n")))?;
            self.ctx.state = State::Active;
            self.frame = frame;
            return self.output.flush();
        }

        let changed = diff_lines(&self.frame, &frame);
        if !changed.is_empty() {
            self.write_changes(&frame, &changed)?;
            self.frame = frame;
        }

        if self.ctx.state.is_terminal() {
            queue!(self.output, Print("\r\n"))?;
        }

        self.output.flush()
    }

    /// The cursor rests at the end of the previous frame's last line.
    fn write_changes(&mut self, frame: &str, changed: &[usize]) -> io::Result<()> {
        let Some(&first) = changed.first() else {
            return Ok(());
        };
        let previous: Vec<&str> = self.frame.split('\n').collect();
        let lines: Vec<&str> = frame.split('\n').collect();
        let last_row = previous.len().saturating_sub(1);

        if last_row > 0 {
            queue!(self.output, cursor::MoveUp(rows(last_row)))?;
        }
        queue!(self.output, cursor::MoveToColumn(0))?;

        if changed.len() == 1 && lines.len() == previous.len() {
            trace!("rewriting line {first}");
            if first > 0 {
                queue!(self.output, cursor::MoveDown(rows(first)))?;
            }
            let line = lines.get(first).copied().unwrap_or_default();
            queue!(self.output, Clear(ClearType::CurrentLine), Print(line))?;

            let below = last_row.saturating_sub(first);
            if below > 0 {
                queue!(self.output, cursor::MoveDown(rows(below)))?;
            }
            return Ok(());
        }

        trace!("rewriting from line {first} ({} changed)", changed.len());
        if first > last_row {
            // Only new lines were appended; open a row below the old frame.
            if last_row > 0 {
                queue!(self.output, cursor::MoveDown(rows(last_row)))?;
            }
            queue!(self.output, Print("\r\n"))?;
        } else if first > 0 {
            queue!(self.output, cursor::MoveDown(rows(first)))?;
        }

        let tail = lines.get(first..).unwrap_or_default().join("\r\n");
        queue!(self.output, Clear(ClearType::FromCursorDown), Print(tail))?;

        // Lines were only removed: step back onto the new last line.
        if first >= lines.len() {
            let last = lines.len().saturating_sub(1);
            let up = first.saturating_sub(last);
            if up > 0 {
                queue!(self.output, cursor::MoveUp(rows(up)))?;
            }
            let line = lines.last().copied().unwrap_or_default();
            queue!(
                self.output,
                cursor::MoveToColumn(0),
                Clear(ClearType::CurrentLine),
                Print(line)
            )?;
        }

        Ok(())
    }
}

fn rows(count: usize) -> u16 {
    u16::try_from(count).unwrap_or(u16::MAX)
}
