//! Single choice from a list.

use colored::Colorize;

use super::SelectOption;
use crate::{
    core::{Context, Key, Prompt, PromptError, State, Widget, move_cursor},
    theme::Theme,
};

pub struct Select<T> {
    message: String,
    options: Vec<SelectOption<T>>,
    /// Starts out as the first option's value.
    initial_value: T,
    theme: Theme,
}

impl<T: Clone + PartialEq + Send> Select<T> {
    /// # Panics
    ///
    /// Panics if `options` is empty.
    #[must_use]
    #[allow(clippy::panic)]
    pub fn new(message: impl Into<String>, options: Vec<SelectOption<T>>) -> Self {
        let Some(first) = options.first() else {
            panic!("Select needs at least one option");
        };
        Self {
            message: message.into(),
            initial_value: first.value.clone(),
            options,
            theme: Theme::current(),
        }
    }

    /// Starts the cursor on the option holding `value`. Unknown values are
    /// ignored.
    #[must_use]
    pub fn with_initial_value(mut self, value: T) -> Self {
        if self.options.iter().any(|o| o.value == value) {
            self.initial_value = value;
        }
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn run(self) -> Result<T, PromptError> {
        Prompt::new(self).run()
    }

    fn line(&self, option: &SelectOption<T>, active: bool) -> String {
        let symbols = &self.theme.symbols;
        if active {
            let mut line = format!(
                "{} {}",
                self.theme.paint(symbols.radio_active, |s| s.green()),
                option.label
            );
            if !option.hint.is_empty() {
                line.push_str(&self.theme.dim(&format!(" ({})", option.hint)));
            }
            line
        } else {
            self.theme.dim(&format!("{} {}", symbols.radio_inactive, option.label))
        }
    }
}

impl<T: Clone + PartialEq + Send> Widget for Select<T> {
    type Value = T;

    fn init(&mut self) -> Context<T> {
        let cursor = self
            .options
            .iter()
            .position(|o| o.value == self.initial_value)
            .unwrap_or_default();
        Context::new(self.initial_value.clone()).with_cursor(cursor)
    }

    fn render(&self, ctx: &Context<T>) -> String {
        let label = self
            .options
            .get(ctx.cursor)
            .map(|o| o.label.as_str())
            .unwrap_or_default();

        let body = match ctx.state {
            State::Submit => self.theme.dim(label),
            State::Cancel => self.theme.struck(label),
            _ => self
                .options
                .iter()
                .enumerate()
                .map(|(idx, option)| self.line(option, idx == ctx.cursor))
                .collect::<Vec<_>>()
                .join("\n"),
        };

        self.theme.frame(ctx.state, &self.message, &body, &ctx.error)
    }

    fn handle_key(&mut self, ctx: &mut Context<T>, key: &Key) {
        let Some(cursor) = move_cursor(ctx.cursor, self.options.len(), key) else {
            return;
        };
        if let Some(option) = self.options.get(cursor) {
            ctx.cursor = cursor;
            ctx.value = option.value.clone();
        }
    }
}
