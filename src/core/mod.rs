//! The prompt engine shared by every widget.
//!
//! - `key` - decoding raw input into [`Key`] events
//! - `diff` - line-level frame comparison
//! - `events` - per-prompt listener registry
//! - `prompt` - the state machine, input loop and incremental renderer

mod cursor;
mod diff;
mod error;
mod events;
mod key;
mod prompt;
mod terminal;
mod validate;

pub use cursor::{min_max_index, move_cursor, track_key_value};
pub use diff::diff_lines;
pub use error::PromptError;
pub use events::{Event, EventEmitter, EventKind, ListenerHandle};
pub use key::{Key, KeyName, KeyReader};
pub use prompt::{Context, Prompt, State, Widget};
pub use terminal::{CrosstermTerminal, NoopTerminal, RawMode, Terminal};
pub use validate::{IsEmpty, REQUIRED_MESSAGE, Validation, Validator};

#[cfg(test)]
mod events_tests;
#[cfg(test)]
mod prompt_tests;
