//! Any number of choices from a list.

use colored::Colorize;

use super::{SelectOption, toggle};
use crate::{
    core::{Context, Key, KeyName, Prompt, PromptError, State, Validation, Widget, move_cursor},
    theme::Theme,
};

pub struct MultiSelect<T> {
    message: String,
    options: Vec<SelectOption<T>>,
    initial_values: Vec<T>,
    validation: Validation<Vec<T>>,
    theme: Theme,
}

impl<T: Clone + PartialEq + Send> MultiSelect<T> {
    #[must_use]
    pub fn new(message: impl Into<String>, options: Vec<SelectOption<T>>) -> Self {
        Self {
            message: message.into(),
            options,
            initial_values: Vec::new(),
            validation: Validation::new(),
            theme: Theme::current(),
        }
    }

    #[must_use]
    pub fn with_initial_values(mut self, values: Vec<T>) -> Self {
        self.initial_values = values;
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
        F: Fn(&Vec<T>) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validation.set_validator(validator);
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn run(self) -> Result<Vec<T>, PromptError> {
        Prompt::new(self).run()
    }

    fn line(&self, option: &SelectOption<T>, active: bool, selected: bool) -> String {
        let symbols = &self.theme.symbols;
        let mut line = match (active, selected) {
            (_, true) => format!(
                "{} {}",
                self.theme.paint(symbols.checkbox_selected, |s| s.green()),
                if active {
                    option.label.clone()
                } else {
                    self.theme.dim(&option.label)
                }
            ),
            (true, false) => format!(
                "{} {}",
                self.theme.paint(symbols.checkbox_active, |s| s.cyan()),
                option.label
            ),
            (false, false) => {
                self.theme.dim(&format!("{} {}", symbols.checkbox_inactive, option.label))
            }
        };
        if active && !option.hint.is_empty() {
            line.push_str(&self.theme.dim(&format!(" ({})", option.hint)));
        }
        line
    }

    fn labels(&self, values: &[T]) -> String {
        values
            .iter()
            .filter_map(|v| self.options.iter().find(|o| &o.value == v))
            .map(|o| o.label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<T: Clone + PartialEq + Send> Widget for MultiSelect<T> {
    type Value = Vec<T>;

    fn init(&mut self) -> Context<Vec<T>> {
        Context::new(self.initial_values.clone())
    }

    fn render(&self, ctx: &Context<Vec<T>>) -> String {
        let body = match ctx.state {
            State::Submit => self.theme.dim(&self.labels(&ctx.value)),
            State::Cancel => self.theme.struck(&self.labels(&ctx.value)),
            _ => self
                .options
                .iter()
                .enumerate()
                .map(|(idx, option)| {
                    self.line(option, idx == ctx.cursor, ctx.value.contains(&option.value))
                })
                .collect::<Vec<_>>()
                .join("\n"),
        };

        self.theme.frame(ctx.state, &self.message, &body, &ctx.error)
    }

    fn handle_key(&mut self, ctx: &mut Context<Vec<T>>, key: &Key) {
        if let Some(cursor) = move_cursor(ctx.cursor, self.options.len(), key) {
            ctx.cursor = cursor;
            return;
        }

        match key.name {
            KeyName::Space => {
                if let Some(option) = self.options.get(ctx.cursor) {
                    toggle(&mut ctx.value, &option.value);
                }
            }
            KeyName::Char('a') if !key.ctrl => {
                let all = self.options.iter().all(|o| ctx.value.contains(&o.value));
                ctx.value = if all {
                    Vec::new()
                } else {
                    self.options.iter().map(|o| o.value.clone()).collect()
                };
            }
            _ => {}
        }
    }

    fn validate(&self, value: &Vec<T>) -> Result<(), String> {
        self.validation.check(value)
    }
}
