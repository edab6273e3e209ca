//! Helpers for driving prompts without a terminal.

use std::{
    io::{self, Write},
    sync::{Arc, Mutex, PoisonError},
};

use crate::core::{Key, KeyName, NoopTerminal, Prompt, Widget};

/// Output sink that can be inspected while a prompt owns it.
#[derive(Clone, Default)]
pub struct SharedOutput(Arc<Mutex<Vec<u8>>>);

impl SharedOutput {
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A prompt wired to a captured output, rendered once so it is `Active`.
pub fn scripted<W: Widget>(widget: W) -> (Prompt<W>, SharedOutput) {
    let output = SharedOutput::default();
    let mut prompt = Prompt::new(widget)
        .with_output(output.clone())
        .with_input(io::empty())
        .with_terminal(NoopTerminal);
    prompt.render().unwrap_or_default();
    (prompt, output)
}

pub fn press<W: Widget>(prompt: &mut Prompt<W>, names: &[KeyName]) {
    for &name in names {
        prompt.press_key(&Key::from(name)).unwrap_or_default();
    }
}

pub fn type_text<W: Widget>(prompt: &mut Prompt<W>, text: &str) {
    for c in text.chars() {
        let key = if c == ' ' {
            Key::new(KeyName::Space)
        } else {
            Key::from_char(c)
        };
        prompt.press_key(&key).unwrap_or_default();
    }
}
