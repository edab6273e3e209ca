use std::io;

use derive_more::{Display, Error};

/// Why a prompt did not resolve to a value.
///
/// Validation failures never surface here; they are rendered in place and
/// the prompt stays interactive.
#[derive(Debug, Display, Error)]
pub enum PromptError {
    /// The user pressed Ctrl-C.
    #[display("prompt cancelled")]
    Cancelled,
    /// Raw mode could not be entered.
    #[display("unable to configure terminal: {_0}")]
    Terminal(io::Error),
    /// Reading keys or writing frames failed, including end of input.
    #[display("terminal i/o failed: {_0}")]
    Io(io::Error),
    /// The input loop panicked before reaching a terminal state.
    #[display("prompt input loop was interrupted")]
    Interrupted,
}

impl PromptError {
    /// True when the user cancelled, as opposed to a genuine failure.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
