//! Pick an option by pressing its key.
//!
//! A matching keypress submits at once, without going through Enter.

use colored::Colorize;

use crate::{
    core::{Context, Key, Prompt, PromptError, State, Widget},
    theme::Theme,
};

const NO_SELECTION: &str = "Press one of the highlighted keys.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedOption<T> {
    /// Matched case-insensitively.
    pub key: char,
    pub value: T,
    pub label: String,
}

impl<T> KeyedOption<T> {
    #[must_use]
    pub fn new(key: char, value: T, label: impl Into<String>) -> Self {
        Self {
            key,
            value,
            label: label.into(),
        }
    }
}

pub struct SelectKey<T> {
    message: String,
    options: Vec<KeyedOption<T>>,
    theme: Theme,
}

impl<T: Clone + Send> SelectKey<T> {
    #[must_use]
    pub fn new(message: impl Into<String>, options: Vec<KeyedOption<T>>) -> Self {
        Self {
            message: message.into(),
            options,
            theme: Theme::current(),
        }
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Runs the prompt on the process terminal.
    pub fn run(self) -> Result<T, PromptError> {
        Prompt::new(self).run()?.ok_or(PromptError::Cancelled)
    }

    fn matching(&self, key: &Key) -> Option<usize> {
        if key.ctrl {
            return None;
        }
        let pressed = key.printable()?;
        self.options
            .iter()
            .position(|o| o.key.to_lowercase().eq(pressed.to_lowercase()))
    }
}

impl<T: Clone + Send> Widget for SelectKey<T> {
    type Value = Option<T>;

    fn init(&mut self) -> Context<Option<T>> {
        Context::new(None)
    }

    fn render(&self, ctx: &Context<Option<T>>) -> String {
        let chosen = ctx
            .value
            .as_ref()
            .and_then(|_| self.options.get(ctx.cursor))
            .map(|o| o.label.as_str())
            .unwrap_or_default();

        let body = match ctx.state {
            State::Submit => self.theme.dim(chosen),
            State::Cancel => self.theme.struck(chosen),
            _ => self
                .options
                .iter()
                .map(|o| {
                    let key = self.theme.paint(&format!("[{}]", o.key), |s| s.cyan());
                    format!("{key} {}", o.label)
                })
                .collect::<Vec<_>>()
                .join("\n"),
        };

        self.theme.frame(ctx.state, &self.message, &body, &ctx.error)
    }

    fn handle_key(&mut self, ctx: &mut Context<Option<T>>, key: &Key) {
        let Some(idx) = self.matching(key) else {
            return;
        };
        if let Some(option) = self.options.get(idx) {
            ctx.value = Some(option.value.clone());
            ctx.cursor = idx;
            ctx.state = State::Submit;
        }
    }

    fn validate(&self, value: &Option<T>) -> Result<(), String> {
        match value {
            Some(_) => Ok(()),
            None => Err(NO_SELECTION.to_string()),
        }
    }
}
