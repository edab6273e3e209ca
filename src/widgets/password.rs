//! Masked text input. The typed value never reaches the output.

use crate::{
    core::{Context, Key, Prompt, PromptError, Validation, Widget, track_key_value},
    theme::Theme,
};

pub struct Password {
    message: String,
    mask: char,
    validation: Validation<String>,
    theme: Theme,
}

impl Password {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        let theme = Theme::current();
        Self {
            message: message.into(),
            mask: theme.symbols.password_mask,
            validation: Validation::new(),
            theme,
        }
    }

    #[must_use]
    pub fn with_mask(mut self, mask: char) -> Self {
        self.mask = mask;
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

    /// Replaces the theme. The mask character is kept.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn run(self) -> Result<String, PromptError> {
        Prompt::new(self).run()
    }
}

impl Widget for Password {
    type Value = String;

    fn init(&mut self) -> Context<String> {
        Context::new(String::new())
    }

    fn render(&self, ctx: &Context<String>) -> String {
        let masked: String = ctx.value.chars().map(|_| self.mask).collect();
        let body = super::input_body(&self.theme, ctx.state, &masked, ctx.cursor, "", "");
        self.theme.frame(ctx.state, &self.message, &body, &ctx.error)
    }

    fn handle_key(&mut self, ctx: &mut Context<String>, key: &Key) {
        let (value, cursor) = track_key_value(&ctx.value, ctx.cursor, key);
        ctx.value = value;
        ctx.cursor = cursor;
    }

    fn validate(&self, value: &String) -> Result<(), String> {
        self.validation.check(value)
    }
}
