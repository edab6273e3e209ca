//! Path entry with completion from the directory being typed.
//!
//! The hint is the rest of the first entry in the typed directory whose name
//! extends the last path segment. Right at the end of the input accepts it;
//! Tab lists every candidate and cycles through them.

use std::path::PathBuf;

use colored::Colorize;
use log::debug;

use crate::{
    core::{
        Context, Key, KeyName, Prompt, PromptError, State, Validation, Widget, min_max_index,
        track_key_value,
    },
    path_tree::{FileSystem, OsFileSystem},
    theme::Theme,
};

pub struct PathInput {
    message: String,
    fs: Box<dyn FileSystem>,
    initial_value: Option<String>,
    placeholder: String,
    only_directories: bool,
    validation: Validation<String>,
    hint: String,
    /// Full names of the candidates, populated by the first Tab.
    hint_options: Vec<String>,
    hint_index: usize,
    theme: Theme,
}

impl PathInput {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fs: Box::new(OsFileSystem),
            initial_value: None,
            placeholder: String::new(),
            only_directories: false,
            validation: Validation::new(),
            hint: String::new(),
            hint_options: Vec::new(),
            hint_index: 0,
            theme: Theme::current(),
        }
    }

    #[must_use]
    pub fn with_file_system<F: FileSystem + 'static>(mut self, fs: F) -> Self {
        self.fs = Box::new(fs);
        self
    }

    /// Starting text. Defaults to the working directory.
    #[must_use]
    pub fn with_initial_value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    #[must_use]
    pub fn with_only_directories(mut self, only_directories: bool) -> Self {
        self.only_directories = only_directories;
        self
    }

    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.validation.set_required(required);
        self
    }

    #[must_use]
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&String) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validation.set_validator(validator);
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn run(self) -> Result<String, PromptError> {
        Prompt::new(self).run()
    }

    /// The completion currently offered after the cursor.
    #[must_use]
    pub fn hint(&self) -> &str {
        &self.hint
    }

    #[must_use]
    pub fn hint_options(&self) -> &[String] {
        &self.hint_options
    }

    /// Entry names in the typed directory that extend the last segment.
    fn candidates(&self, value: &str) -> Vec<String> {
        let (dir, base) = split_input(value);
        let dir = if dir.is_absolute() {
            dir
        } else {
            match self.fs.current_dir() {
                Ok(cwd) => cwd.join(dir),
                Err(e) => {
                    debug!("unable to read working directory: {e}");
                    dir
                }
            }
        };

        let entries = self.fs.read_dir(&dir).unwrap_or_else(|e| {
            debug!("unable to list {}: {e}", dir.display());
            Vec::new()
        });

        entries
            .into_iter()
            .filter(|entry| entry.is_dir || !self.only_directories)
            .map(|entry| entry.name)
            .filter(|name| name.len() > base.len() && name.starts_with(base))
            .collect()
    }

    fn refresh_hint(&mut self, value: &str) {
        self.hint_options.clear();
        self.hint_index = 0;
        let (_, base) = split_input(value);
        self.hint = self
            .candidates(value)
            .first()
            .and_then(|name| name.strip_prefix(base))
            .map(str::to_string)
            .unwrap_or_default();
    }

    fn cycle_hint(&mut self, value: &str) {
        if self.hint_options.is_empty() {
            self.hint_options = self.candidates(value);
            self.hint_index = 0;
        } else {
            let next = isize::try_from(self.hint_index)
                .unwrap_or_default()
                .saturating_add(1);
            self.hint_index = min_max_index(next, self.hint_options.len());
        }

        let (_, base) = split_input(value);
        self.hint = self
            .hint_options
            .get(self.hint_index)
            .and_then(|name| name.strip_prefix(base))
            .map(str::to_string)
            .unwrap_or_default();
    }
}

/// Splits typed text into its directory and trailing segment.
fn split_input(value: &str) -> (PathBuf, &str) {
    match value.rsplit_once('/') {
        Some(("", base)) => (PathBuf::from("/"), base),
        Some((dir, base)) => (PathBuf::from(dir), base),
        None => (PathBuf::new(), value),
    }
}

impl Widget for PathInput {
    type Value = String;

    fn init(&mut self) -> Context<String> {
        let value = self.initial_value.clone().unwrap_or_else(|| {
            self.fs
                .current_dir()
                .map(|cwd| cwd.display().to_string())
                .unwrap_or_default()
        });
        self.refresh_hint(&value);
        let cursor = value.chars().count();
        Context::new(value).with_cursor(cursor)
    }

    fn render(&self, ctx: &Context<String>) -> String {
        let at_end = ctx.cursor >= ctx.value.chars().count();
        let suffix = if at_end && !ctx.state.is_terminal() {
            self.hint.as_str()
        } else {
            ""
        };
        let placeholder = if ctx.state.is_terminal() {
            ""
        } else {
            self.placeholder.as_str()
        };

        let mut body =
            super::input_body(&self.theme, ctx.state, &ctx.value, ctx.cursor, placeholder, suffix);

        if matches!(ctx.state, State::Active | State::Error) {
            for (idx, name) in self.hint_options.iter().enumerate() {
                body.push('\n');
                if idx == self.hint_index {
                    let marker = self.theme.paint(self.theme.symbols.radio_active, |s| s.cyan());
                    body.push_str(&format!("{marker} {name}"));
                } else {
                    body.push_str(
                        &self
                            .theme
                            .dim(&format!("{} {name}", self.theme.symbols.radio_inactive)),
                    );
                }
            }
        }

        self.theme.frame(ctx.state, &self.message, &body, &ctx.error)
    }

    fn handle_key(&mut self, ctx: &mut Context<String>, key: &Key) {
        let len = ctx.value.chars().count();

        match key.name {
            KeyName::Right if ctx.cursor >= len => {
                if !self.hint.is_empty() {
                    ctx.value.push_str(&self.hint);
                } else if ctx.value.is_empty() {
                    ctx.value.clone_from(&self.placeholder);
                }
                ctx.cursor = ctx.value.chars().count();
                self.refresh_hint(&ctx.value);
            }
            KeyName::Tab => self.cycle_hint(&ctx.value),
            _ => {
                let (value, cursor) = track_key_value(&ctx.value, ctx.cursor, key);
                ctx.value = value;
                ctx.cursor = cursor;
                self.refresh_hint(&ctx.value);
            }
        }
    }

    fn validate(&self, value: &String) -> Result<(), String> {
        self.validation.check(value)
    }
}
