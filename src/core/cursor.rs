//! Cursor and text-tracking rules shared by widgets.

use super::key::{Key, KeyName};

/// Wraps an index into `0..length`.
///
/// Negative indices wrap to the last position, indices at or past `length`
/// wrap to zero. An empty range always yields zero.
#[must_use]
pub fn min_max_index(index: isize, length: usize) -> usize {
    match usize::try_from(index) {
        _ if length == 0 => 0,
        Err(_) => length.saturating_sub(1),
        Ok(idx) if idx >= length => 0,
        Ok(idx) => idx,
    }
}

/// Applies a key to a text value and its cursor (in characters).
///
/// Backspace deletes before the cursor, Home/End jump, Left/Right move by
/// one within bounds, and a printable character is inserted at the cursor.
/// Every other key leaves both unchanged.
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn track_key_value(value: &str, cursor: usize, key: &Key) -> (String, usize) {
    let mut chars: Vec<char> = value.chars().collect();
    let len = chars.len();
    let cursor = cursor.min(len);

    match key.name {
        KeyName::Backspace => {
            if cursor == 0 {
                return (value.to_string(), 0);
            }
            chars.remove(cursor - 1);
            (chars.into_iter().collect(), cursor - 1)
        }
        KeyName::Home => (value.to_string(), 0),
        KeyName::End => (value.to_string(), len),
        KeyName::Left => (value.to_string(), cursor.saturating_sub(1)),
        KeyName::Right => (value.to_string(), (cursor + 1).min(len)),
        _ => match key.printable() {
            Some(c) => {
                chars.insert(cursor, c);
                (chars.into_iter().collect(), cursor + 1)
            }
            None => (value.to_string(), cursor),
        },
    }
}

/// Moves a list cursor for a navigation key, wrapping at both ends.
///
/// Returns `None` when the key is not a navigation key.
#[must_use]
pub fn move_cursor(cursor: usize, length: usize, key: &Key) -> Option<usize> {
    let current = isize::try_from(cursor).unwrap_or(isize::MAX);

    match key.name {
        KeyName::Up | KeyName::Left => Some(min_max_index(current.saturating_sub(1), length)),
        KeyName::Down | KeyName::Right => Some(min_max_index(current.saturating_add(1), length)),
        KeyName::Home => Some(0),
        KeyName::End => Some(length.saturating_sub(1)),
        _ => None,
    }
}
