//! Raw-mode boundary.

use std::io;

use log::{debug, warn};

/// Switches the controlling terminal in and out of raw mode.
pub trait Terminal: Send {
    fn enable_raw_mode(&mut self) -> io::Result<()>;
    fn disable_raw_mode(&mut self) -> io::Result<()>;
}

/// The process terminal, driven through crossterm.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermTerminal;

impl Terminal for CrosstermTerminal {
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        crossterm::terminal::enable_raw_mode()
    }

    fn disable_raw_mode(&mut self) -> io::Result<()> {
        crossterm::terminal::disable_raw_mode()
    }
}

/// A terminal that never changes mode. Used for scripted input.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTerminal;

impl Terminal for NoopTerminal {
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// RAII guard for raw mode.
///
/// Raw mode is enabled on creation and restored on drop (even on panic).
pub struct RawMode {
    terminal: Box<dyn Terminal>,
}

impl RawMode {
    /// Enables raw mode, taking ownership of the terminal until the guard drops.
    pub fn enter(mut terminal: Box<dyn Terminal>) -> io::Result<Self> {
        terminal.enable_raw_mode()?;
        debug!("raw mode enabled");
        Ok(Self { terminal })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = self.terminal.disable_raw_mode() {
            warn!("unable to restore terminal mode: {e}");
        } else {
            debug!("raw mode restored");
        }
    }
}
