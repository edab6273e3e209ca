//! Composable interactive terminal prompts.
//!
//! Every widget runs on the same engine: keys are decoded from raw input,
//! handed to the widget, and the frame it renders is diffed against the last
//! one so only changed lines reach the terminal.

mod common;
mod config;
pub mod core;
mod logging;
pub mod path_tree;
pub mod theme;
pub mod widgets;

#[cfg(test)]
mod testing;

pub use common::{PROJECT_NAME, PROJECT_VERSION};
pub use config::{Config, ConfigureArgs, configure, show_configuration};
pub use crate::core::{
    Context, Event, EventKind, Key, KeyName, NoopTerminal, Prompt, PromptError, State, Widget,
};
pub use logging::Logging;
pub use path_tree::{DirEntry, FileSystem, MemoryFileSystem, OsFileSystem};
pub use theme::Theme;
pub use widgets::{
    Confirm, GroupMultiSelect, KeyedOption, MultiSelect, MultiSelectPath, OptionGroup, Password,
    PathInput, Select, SelectKey, SelectOption, SelectPath, Text,
};
