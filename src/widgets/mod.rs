//! The concrete prompts built on the engine.

mod confirm;
mod group_multi_select;
mod multi_select;
mod multi_select_path;
mod password;
mod path;
mod select;
mod select_key;
mod select_path;
mod text;
mod tree;

pub use confirm::Confirm;
pub use group_multi_select::{GroupEntry, GroupMultiSelect, OptionGroup};
pub use multi_select::MultiSelect;
pub use multi_select_path::MultiSelectPath;
pub use password::Password;
pub use path::PathInput;
pub use select::Select;
pub use select_key::{KeyedOption, SelectKey};
pub use select_path::SelectPath;
pub use text::Text;

use colored::Colorize;

use crate::{core::State, theme::Theme};

/// One choice in a list prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption<T> {
    pub value: T,
    pub label: String,
    /// Shown next to the label while the option is under the cursor.
    pub hint: String,
}

impl<T> SelectOption<T> {
    #[must_use]
    pub fn new(value: T, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
            hint: String::new(),
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }
}

/// Removes `value` if present, otherwise appends it.
///
/// Re-adding appends at the end rather than restoring the original position.
pub(crate) fn toggle<T: PartialEq + Clone>(values: &mut Vec<T>, value: &T) {
    if let Some(pos) = values.iter().position(|v| v == value) {
        values.remove(pos);
    } else {
        values.push(value.clone());
    }
}

/// Text with the cursor drawn as an inverted cell.
pub(crate) fn with_cursor(theme: &Theme, value: &str, cursor: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    let (before, rest) = chars.split_at(cursor.min(chars.len()));
    let before: String = before.iter().collect();

    match rest.split_first() {
        Some((at, after)) => {
            let after: String = after.iter().collect();
            let at = at.to_string();
            format!("{before}{}{after}", theme.paint(&at, |s| s.reversed()))
        }
        None => format!("{before}{}", theme.paint(" ", |s| s.reversed())),
    }
}

/// Body of a single-line input, shared by the text-like prompts.
///
/// `suffix` is drawn dimmed after the cursor (completion hints).
pub(crate) fn input_body(
    theme: &Theme,
    state: State,
    shown: &str,
    cursor: usize,
    placeholder: &str,
    suffix: &str,
) -> String {
    match state {
        State::Submit => theme.dim(shown),
        State::Cancel => theme.struck(shown),
        State::Initial | State::Active | State::Error => {
            if shown.is_empty() && !placeholder.is_empty() {
                let mut chars = placeholder.chars();
                let first = chars.next().map(String::from).unwrap_or_default();
                let rest: String = chars.collect();
                format!("{}{}", theme.paint(&first, |s| s.reversed()), theme.dim(&rest))
            } else if suffix.is_empty() {
                with_cursor(theme, shown, cursor)
            } else {
                format!("{shown}{}", theme.dim(suffix))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut values = vec![1, 2];

        toggle(&mut values, &3);
        assert_eq!(values, [1, 2, 3]);

        toggle(&mut values, &3);
        assert_eq!(values, [1, 2]);
    }

    #[test]
    fn test_toggle_readds_at_end() {
        let mut values = vec!["a", "b", "c"];

        toggle(&mut values, &"a");
        toggle(&mut values, &"a");

        // Same set, different order
        assert_eq!(values, ["b", "c", "a"]);
    }

    #[test]
    fn test_with_cursor_plain_keeps_text() {
        let theme = Theme::plain();

        assert_eq!(with_cursor(&theme, "abc", 1), "abc");
        assert_eq!(with_cursor(&theme, "abc", 3), "abc ");
        assert_eq!(with_cursor(&theme, "", 0), " ");
    }

    #[test]
    fn test_input_body_prefers_placeholder_when_empty() {
        let theme = Theme::plain();

        assert_eq!(input_body(&theme, State::Active, "", 0, "name", ""), "name");
        assert_eq!(input_body(&theme, State::Active, "go", 2, "", "-extras"), "go-extras");
        assert_eq!(input_body(&theme, State::Submit, "done", 4, "", ""), "done");
    }
}
