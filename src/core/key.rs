//! Key decoding for raw terminal input.
//!
//! Bytes arrive one rune at a time from a buffered reader. Control bytes map
//! to semantic key names, `ESC [ <code>` sequences map to the navigation keys,
//! and everything else becomes a character key.

use std::io::{self, BufRead, BufReader, Read};

/// Semantic name of a decoded key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyName {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Enter,
    Backspace,
    Space,
    Tab,
    /// Ctrl-C (ETX)
    Cancel,
    /// Any other rune. Control letters decode to their lowercase letter with `ctrl` set.
    Char(char),
    /// Input that carries no meaning, such as a bare escape.
    None,
}

/// A single key event.
///
/// Produced once per input event and handed to listeners by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub name: KeyName,
    /// The literal character typed, if the key inserts text.
    pub char: Option<char>,
    pub shift: bool,
    pub ctrl: bool,
}

impl Key {
    /// Creates a key with no modifiers.
    #[must_use]
    pub fn new(name: KeyName) -> Self {
        let char = match name {
            KeyName::Space => Some(' '),
            KeyName::Char(c) => Some(c),
            _ => None,
        };
        Self {
            name,
            char,
            shift: false,
            ctrl: false,
        }
    }

    /// Creates a printable character key.
    #[must_use]
    pub fn from_char(c: char) -> Self {
        Self {
            shift: c.is_uppercase(),
            ..Self::new(KeyName::Char(c))
        }
    }

    /// Creates a Ctrl+letter key. It carries no insertable character.
    #[must_use]
    pub fn ctrl(letter: char) -> Self {
        Self {
            name: KeyName::Char(letter),
            char: None,
            shift: false,
            ctrl: true,
        }
    }

    /// The no-op key.
    #[must_use]
    pub fn none() -> Self {
        Self::new(KeyName::None)
    }

    /// Returns the character this key would insert into a text value.
    #[must_use]
    pub fn printable(&self) -> Option<char> {
        self.char.filter(|c| !c.is_control())
    }
}

impl From<KeyName> for Key {
    fn from(name: KeyName) -> Self {
        match name {
            KeyName::Char(c) => Self::from_char(c),
            other => Self::new(other),
        }
    }
}

/// Decodes keys from a byte stream.
pub struct KeyReader<R> {
    reader: BufReader<R>,
}

impl<R: Read> KeyReader<R> {
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
        }
    }

    /// Blocks until one key has been decoded.
    ///
    /// End of input is reported as `UnexpectedEof`.
    pub fn read_key(&mut self) -> io::Result<Key> {
        let rune = self.read_rune()?;

        let key = match rune {
            '\r' | '\n' => Key::new(KeyName::Enter),
            '\u{8}' | '\u{7f}' => Key::new(KeyName::Backspace),
            ' ' => Key::new(KeyName::Space),
            '\t' => Key::new(KeyName::Tab),
            '\u{3}' => Key::new(KeyName::Cancel),
            '\u{1b}' => self.read_escape(),
            c @ '\u{1}'..='\u{1a}' => control_letter(c).map_or_else(Key::none, Key::ctrl),
            c => Key::from_char(c),
        };

        Ok(key)
    }

    /// Decodes a CSI sequence from bytes already buffered, so a lone escape
    /// never waits on the next keystroke. Unknown sequences are swallowed
    /// whole.
    fn read_escape(&mut self) -> Key {
        let Some(rest) = self.reader.buffer().strip_prefix(b"[") else {
            return Key::none();
        };
        // Parameter bytes run up to a final byte in 0x40..=0x7E
        let Some(end) = rest.iter().position(|b| (0x40..=0x7E).contains(b)) else {
            return Key::none();
        };

        let name = match rest.get(..=end) {
            Some(b"A") => Some(KeyName::Up),
            Some(b"B") => Some(KeyName::Down),
            Some(b"C") => Some(KeyName::Right),
            Some(b"D") => Some(KeyName::Left),
            Some(b"H" | b"1~" | b"7~") => Some(KeyName::Home),
            Some(b"F" | b"4~" | b"8~") => Some(KeyName::End),
            _ => None,
        };

        self.reader.consume(end.saturating_add(2));
        name.map_or_else(Key::none, Key::new)
    }

    fn read_rune(&mut self) -> io::Result<char> {
        let mut buf = [0u8; 4];
        let (first, rest) = buf.split_at_mut(1);
        self.reader.read_exact(first)?;

        let width = utf8_width(first.first().copied().unwrap_or_default());
        if let Some(tail) = rest.get_mut(..width.saturating_sub(1)) {
            self.reader.read_exact(tail)?;
        }

        let rune = buf
            .get(..width)
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
            .and_then(|s| s.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER);

        Ok(rune)
    }
}

fn utf8_width(lead: u8) -> usize {
    match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

#[allow(clippy::arithmetic_side_effects)]
fn control_letter(c: char) -> Option<char> {
    // 0x01 is Ctrl-A
    char::from_u32(u32::from(c) + u32::from(b'a') - 1)
}
