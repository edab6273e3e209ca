//! Single-line text input.

use crate::{
    core::{Context, Key, KeyName, Prompt, PromptError, State, Validation, Widget, track_key_value},
    theme::Theme,
};

pub struct Text {
    message: String,
    placeholder: String,
    initial_value: String,
    validation: Validation<String>,
    theme: Theme,
}

impl Text {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            placeholder: String::new(),
            initial_value: String::new(),
            validation: Validation::new(),
            theme: Theme::current(),
        }
    }

    /// Shown dimmed while the value is empty. Tab accepts it.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    #[must_use]
    pub fn with_initial_value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = value.into();
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

    /// Runs the prompt on the process terminal.
    pub fn run(self) -> Result<String, PromptError> {
        Prompt::new(self).run()
    }
}

impl Widget for Text {
    type Value = String;

    fn init(&mut self) -> Context<String> {
        let cursor = self.initial_value.chars().count();
        Context::new(self.initial_value.clone()).with_cursor(cursor)
    }

    fn render(&self, ctx: &Context<String>) -> String {
        let placeholder = match ctx.state {
            State::Submit | State::Cancel => "",
            _ => self.placeholder.as_str(),
        };
        let body = super::input_body(&self.theme, ctx.state, &ctx.value, ctx.cursor, placeholder, "");
        self.theme.frame(ctx.state, &self.message, &body, &ctx.error)
    }

    fn handle_key(&mut self, ctx: &mut Context<String>, key: &Key) {
        if key.name == KeyName::Tab && ctx.value.is_empty() && !self.placeholder.is_empty() {
            ctx.value.clone_from(&self.placeholder);
            ctx.cursor = ctx.value.chars().count();
            return;
        }

        let (value, cursor) = track_key_value(&ctx.value, ctx.cursor, key);
        ctx.value = value;
        ctx.cursor = cursor;
    }

    fn validate(&self, value: &String) -> Result<(), String> {
        self.validation.check(value)
    }
}
