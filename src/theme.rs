//! Symbols and colors shared by every widget frame.
//!
//! The process-wide [`Theme`] is installed once at startup and read-only
//! afterwards. Widgets copy it when they are created, so a single widget can
//! also be given its own theme with `with_theme`.

use std::{env, sync::OnceLock};

use colored::{ColoredString, Colorize};
use log::debug;

use crate::{config::Config, core::State};

static THEME: OnceLock<Theme> = OnceLock::new();

/// Glyphs used to draw prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbols {
    pub step_active: &'static str,
    pub step_cancel: &'static str,
    pub step_error: &'static str,
    pub step_submit: &'static str,
    pub bar: &'static str,
    pub bar_end: &'static str,
    pub radio_active: &'static str,
    pub radio_inactive: &'static str,
    pub checkbox_active: &'static str,
    pub checkbox_selected: &'static str,
    pub checkbox_inactive: &'static str,
    pub folder_open: &'static str,
    pub folder_closed: &'static str,
    pub password_mask: char,
}

impl Symbols {
    pub const UNICODE: Self = Self {
        step_active: "◆",
        step_cancel: "■",
        step_error: "▲",
        step_submit: "◇",
        bar: "│",
        bar_end: "└",
        radio_active: "●",
        radio_inactive: "○",
        checkbox_active: "◻",
        checkbox_selected: "◼",
        checkbox_inactive: "◻",
        folder_open: "▾",
        folder_closed: "▸",
        password_mask: '▪',
    };

    pub const ASCII: Self = Self {
        step_active: "*",
        step_cancel: "x",
        step_error: "x",
        step_submit: "o",
        bar: "|",
        bar_end: "-",
        radio_active: ">",
        radio_inactive: " ",
        checkbox_active: "[•]",
        checkbox_selected: "[+]",
        checkbox_inactive: "[ ]",
        folder_open: "v",
        folder_closed: ">",
        password_mask: '•',
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub symbols: Symbols,
    pub color: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl Theme {
    #[must_use]
    pub fn new(unicode: bool, color: bool) -> Self {
        let symbols = if unicode {
            Symbols::UNICODE
        } else {
            Symbols::ASCII
        };
        Self { symbols, color }
    }

    /// Unicode symbols, no escape codes. Output is stable for assertions.
    #[must_use]
    pub fn plain() -> Self {
        Self::new(true, false)
    }

    /// Probes the environment: `NO_COLOR` disables color and the Linux
    /// console falls back to ASCII.
    #[must_use]
    pub fn detect() -> Self {
        let unicode = !env::var("TERM").is_ok_and(|term| term == "linux");
        Self::new(unicode, !no_color())
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.unicode, config.color && !no_color())
    }

    /// Installs the process-wide theme. Only the first call has an effect.
    pub fn install(self) -> bool {
        let installed = THEME.set(self).is_ok();
        if !installed {
            debug!("theme already installed, keeping the existing one");
        }
        installed
    }

    /// The installed theme, detected from the environment if none was.
    #[must_use]
    pub fn current() -> Self {
        *THEME.get_or_init(Self::detect)
    }

    /// Applies `style` only when color is enabled.
    pub fn paint<F>(&self, text: &str, style: F) -> String
    where
        F: FnOnce(&str) -> ColoredString,
    {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(text, |s| s.dimmed())
    }

    pub fn struck(&self, text: &str) -> String {
        self.paint(text, |s| s.strikethrough().dimmed())
    }

    #[must_use]
    pub fn state_symbol(&self, state: State) -> String {
        match state {
            State::Initial | State::Active => self.paint(self.symbols.step_active, |s| s.cyan()),
            State::Error => self.paint(self.symbols.step_error, |s| s.yellow()),
            State::Submit => self.paint(self.symbols.step_submit, |s| s.green()),
            State::Cancel => self.paint(self.symbols.step_cancel, |s| s.red()),
        }
    }

    fn bar(&self, state: State) -> String {
        match state {
            State::Initial | State::Active => self.paint(self.symbols.bar, |s| s.cyan()),
            State::Error => self.paint(self.symbols.bar, |s| s.yellow()),
            State::Submit | State::Cancel => self.paint(self.symbols.bar, |s| s.bright_black()),
        }
    }

    /// Lays out a prompt:
    ///
    /// ```text
    /// │
    /// ◆  message
    /// │  body
    /// └  error
    /// ```
    ///
    /// The closing line only appears while the prompt is interactive.
    #[must_use]
    pub fn frame(&self, state: State, message: &str, body: &str, error: &str) -> String {
        let bar = self.bar(state);
        let mut lines = vec![
            self.paint(self.symbols.bar, |s| s.bright_black()),
            format!("{}  {message}", self.state_symbol(state)),
        ];

        lines.extend(body.lines().map(|line| format!("{bar}  {line}")));

        match state {
            State::Initial | State::Active => {
                lines.push(self.paint(self.symbols.bar_end, |s| s.cyan()));
            }
            State::Error => {
                let end = self.paint(self.symbols.bar_end, |s| s.yellow());
                lines.push(format!("{end}  {}", self.paint(error, |s| s.yellow())));
            }
            State::Submit | State::Cancel => {}
        }

        lines.join("\n")
    }
}

fn no_color() -> bool {
    env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty())
}
