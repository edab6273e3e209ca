//! Multi-select over options arranged in named groups.
//!
//! Group headers sit in the cursor sequence alongside their options.
//! Toggling a header selects or clears the whole group. With
//! `disabled_groups` the headers are only drawn, never focused.

use colored::Colorize;

use super::{SelectOption, toggle};
use crate::{
    core::{Context, Key, KeyName, Prompt, PromptError, State, Validation, Widget, move_cursor},
    theme::Theme,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionGroup<T> {
    pub name: String,
    pub options: Vec<SelectOption<T>>,
}

impl<T> OptionGroup<T> {
    #[must_use]
    pub fn new(name: impl Into<String>, options: Vec<SelectOption<T>>) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }
}

/// A position in the cursor sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupEntry {
    Group(usize),
    /// Group index, option index within the group.
    Option(usize, usize),
}

pub struct GroupMultiSelect<T> {
    message: String,
    groups: Vec<OptionGroup<T>>,
    entries: Vec<GroupEntry>,
    disabled_groups: bool,
    initial_values: Vec<T>,
    validation: Validation<Vec<T>>,
    theme: Theme,
}

impl<T: Clone + PartialEq + Send> GroupMultiSelect<T> {
    #[must_use]
    pub fn new(message: impl Into<String>, groups: Vec<OptionGroup<T>>) -> Self {
        let mut widget = Self {
            message: message.into(),
            groups,
            entries: Vec::new(),
            disabled_groups: false,
            initial_values: Vec::new(),
            validation: Validation::new(),
            theme: Theme::current(),
        };
        widget.build_entries();
        widget
    }

    /// Removes group headers from the cursor sequence.
    #[must_use]
    pub fn with_disabled_groups(mut self, disabled: bool) -> Self {
        self.disabled_groups = disabled;
        self.build_entries();
        self
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

    /// The navigable sequence, in display order.
    #[must_use]
    pub fn entries(&self) -> &[GroupEntry] {
        &self.entries
    }

    /// True when the group is non-empty and every one of its options is in `value`.
    #[must_use]
    pub fn is_group_selected(&self, value: &[T], name: &str) -> bool {
        self.groups
            .iter()
            .find(|g| g.name == name)
            .is_some_and(|group| Self::all_selected(group, value))
    }

    fn all_selected(group: &OptionGroup<T>, value: &[T]) -> bool {
        !group.options.is_empty() && group.options.iter().all(|o| value.contains(&o.value))
    }

    fn build_entries(&mut self) {
        self.entries.clear();
        for (g, group) in self.groups.iter().enumerate() {
            if !self.disabled_groups {
                self.entries.push(GroupEntry::Group(g));
            }
            self.entries
                .extend((0..group.options.len()).map(|o| GroupEntry::Option(g, o)));
        }
    }

    fn option(&self, group: usize, option: usize) -> Option<&SelectOption<T>> {
        self.groups.get(group).and_then(|g| g.options.get(option))
    }

    fn toggle_group(&self, value: &mut Vec<T>, group: usize) {
        let Some(group) = self.groups.get(group) else {
            return;
        };
        if Self::all_selected(group, value) {
            value.retain(|v| !group.options.iter().any(|o| &o.value == v));
        } else {
            for option in &group.options {
                if !value.contains(&option.value) {
                    value.push(option.value.clone());
                }
            }
        }
    }

    fn checkbox(&self, active: bool, selected: bool) -> String {
        let symbols = &self.theme.symbols;
        match (active, selected) {
            (_, true) => self.theme.paint(symbols.checkbox_selected, |s| s.green()),
            (true, false) => self.theme.paint(symbols.checkbox_active, |s| s.cyan()),
            (false, false) => self.theme.dim(symbols.checkbox_inactive),
        }
    }

    fn lines(&self, ctx: &Context<Vec<T>>) -> Vec<String> {
        let active = self.entries.get(ctx.cursor).copied();
        let mut lines = Vec::new();

        for (g, group) in self.groups.iter().enumerate() {
            let header_active = active == Some(GroupEntry::Group(g));
            if self.disabled_groups {
                lines.push(self.theme.dim(&group.name));
            } else {
                let checkbox = self.checkbox(header_active, Self::all_selected(group, &ctx.value));
                let name = if header_active {
                    group.name.clone()
                } else {
                    self.theme.dim(&group.name)
                };
                lines.push(format!("{checkbox} {name}"));
            }

            let last = group.options.len().saturating_sub(1);
            for (o, option) in group.options.iter().enumerate() {
                let is_active = active == Some(GroupEntry::Option(g, o));
                let branch = if o == last {
                    self.theme.symbols.bar_end
                } else {
                    self.theme.symbols.bar
                };
                let checkbox = self.checkbox(is_active, ctx.value.contains(&option.value));
                let label = if is_active {
                    option.label.clone()
                } else {
                    self.theme.dim(&option.label)
                };
                let mut line = format!("{} {checkbox} {label}", self.theme.dim(branch));
                if is_active && !option.hint.is_empty() {
                    line.push_str(&self.theme.dim(&format!(" ({})", option.hint)));
                }
                lines.push(line);
            }
        }

        lines
    }

    fn labels(&self, value: &[T]) -> String {
        value
            .iter()
            .filter_map(|v| {
                self.groups
                    .iter()
                    .flat_map(|g| g.options.iter())
                    .find(|o| &o.value == v)
            })
            .map(|o| o.label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<T: Clone + PartialEq + Send> Widget for GroupMultiSelect<T> {
    type Value = Vec<T>;

    fn init(&mut self) -> Context<Vec<T>> {
        Context::new(self.initial_values.clone())
    }

    fn render(&self, ctx: &Context<Vec<T>>) -> String {
        let body = match ctx.state {
            State::Submit => self.theme.dim(&self.labels(&ctx.value)),
            State::Cancel => self.theme.struck(&self.labels(&ctx.value)),
            _ => self.lines(ctx).join("\n"),
        };

        self.theme.frame(ctx.state, &self.message, &body, &ctx.error)
    }

    fn handle_key(&mut self, ctx: &mut Context<Vec<T>>, key: &Key) {
        if let Some(cursor) = move_cursor(ctx.cursor, self.entries.len(), key) {
            ctx.cursor = cursor;
            return;
        }

        if key.name != KeyName::Space {
            return;
        }

        match self.entries.get(ctx.cursor).copied() {
            Some(GroupEntry::Group(g)) => self.toggle_group(&mut ctx.value, g),
            Some(GroupEntry::Option(g, o)) => {
                if let Some(option) = self.option(g, o) {
                    toggle(&mut ctx.value, &option.value);
                }
            }
            None => {}
        }
    }

    fn validate(&self, value: &Vec<T>) -> Result<(), String> {
        self.validation.check(value)
    }
}
