//! Yes/no toggle.

use colored::Colorize;

use crate::{
    core::{Context, Key, KeyName, Prompt, PromptError, State, Widget},
    theme::Theme,
};

pub struct Confirm {
    message: String,
    active: String,
    inactive: String,
    initial_value: bool,
    theme: Theme,
}

impl Confirm {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            active: "Yes".to_string(),
            inactive: "No".to_string(),
            initial_value: false,
            theme: Theme::current(),
        }
    }

    /// Labels for the `true` and `false` choices.
    #[must_use]
    pub fn with_labels(mut self, active: impl Into<String>, inactive: impl Into<String>) -> Self {
        self.active = active.into();
        self.inactive = inactive.into();
        self
    }

    #[must_use]
    pub fn with_initial_value(mut self, value: bool) -> Self {
        self.initial_value = value;
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn run(self) -> Result<bool, PromptError> {
        Prompt::new(self).run()
    }

    fn choice(&self, label: &str, chosen: bool) -> String {
        let symbols = &self.theme.symbols;
        if chosen {
            format!("{} {label}", self.theme.paint(symbols.radio_active, |s| s.green()))
        } else {
            self.theme.dim(&format!("{} {label}", symbols.radio_inactive))
        }
    }
}

impl Widget for Confirm {
    type Value = bool;

    fn init(&mut self) -> Context<bool> {
        Context::new(self.initial_value).with_cursor(usize::from(self.initial_value))
    }

    fn render(&self, ctx: &Context<bool>) -> String {
        let label = if ctx.value {
            &self.active
        } else {
            &self.inactive
        };

        let body = match ctx.state {
            State::Submit => self.theme.dim(label),
            State::Cancel => self.theme.struck(label),
            _ => format!(
                "{} / {}",
                self.choice(&self.active, ctx.value),
                self.choice(&self.inactive, !ctx.value)
            ),
        };

        self.theme.frame(ctx.state, &self.message, &body, &ctx.error)
    }

    fn handle_key(&mut self, ctx: &mut Context<bool>, key: &Key) {
        match key.name {
            KeyName::Up | KeyName::Down | KeyName::Left | KeyName::Right => ctx.value = !ctx.value,
            KeyName::Char('y' | 'Y') if !key.ctrl => ctx.value = true,
            KeyName::Char('n' | 'N') if !key.ctrl => ctx.value = false,
            _ => return,
        }
        ctx.cursor = usize::from(ctx.value);
    }
}
