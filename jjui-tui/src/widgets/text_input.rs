use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use graph::{Line, Segment};

use crate::theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Submit(String),
    Cancel,
    Changed,
    Ignored,
}

/// Single-line editor with a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    prompt: String,
    value: String,
    /// Cursor position in chars
    cursor: usize,
}

impl TextInput {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self::with_value(prompt, "")
    }

    /// Pre-filled, cursor at the end
    pub fn with_value(prompt: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            prompt: prompt.into(),
            cursor: value.chars().count(),
            value,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> InputEvent {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => InputEvent::Submit(self.value.clone()),
            KeyCode::Esc => InputEvent::Cancel,
            KeyCode::Char('u') if control => {
                self.value.clear();
                self.cursor = 0;
                InputEvent::Changed
            }
            KeyCode::Char(c) if !control && !key.modifiers.contains(KeyModifiers::ALT) => {
                let at = self.byte_offset(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
                InputEvent::Changed
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                let at = self.byte_offset(self.cursor);
                self.value.remove(at);
                InputEvent::Changed
            }
            KeyCode::Delete if self.cursor < self.len() => {
                let at = self.byte_offset(self.cursor);
                self.value.remove(at);
                InputEvent::Changed
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                InputEvent::Changed
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.len());
                InputEvent::Changed
            }
            KeyCode::Home => {
                self.cursor = 0;
                InputEvent::Changed
            }
            KeyCode::End => {
                self.cursor = self.len();
                InputEvent::Changed
            }
            KeyCode::Backspace | KeyCode::Delete => InputEvent::Changed,
            _ => InputEvent::Ignored,
        }
    }

    /// Prompt, text and a reversed block at the cursor
    pub fn line(&self) -> Line {
        let at = self.byte_offset(self.cursor);
        let (before, rest) = self.value.split_at(at);
        let mut rest = rest.chars();
        let under_cursor = rest.next().map_or_else(|| " ".to_string(), String::from);

        let mut line = Line::default();
        line.push(Segment::new(self.prompt.as_str(), theme::PROMPT));
        line.push(Segment::plain(before));
        line.push(Segment {
            reversed: true,
            ..Segment::plain(under_cursor)
        });
        line.push(Segment::plain(rest.as_str()));
        line
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.value
            .char_indices()
            .nth(chars)
            .map_or(self.value.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{char_key, key};
    use pretty_assertions::assert_eq;

    fn type_text(input: &mut TextInput, text: &str) {
        for c in text.chars() {
            input.handle_key(&char_key(c));
        }
    }

    #[test]
    fn edits_at_the_cursor() {
        let mut input = TextInput::new("name: ");
        type_text(&mut input, "mian");
        input.handle_key(&key(KeyCode::Left));
        input.handle_key(&key(KeyCode::Left));
        input.handle_key(&key(KeyCode::Backspace));
        input.handle_key(&key(KeyCode::Right));
        type_text(&mut input, "i");

        assert_eq!(input.value(), "main");
    }

    #[test]
    fn submit_and_cancel() {
        let mut input = TextInput::with_value("> ", "trunk()");
        assert_eq!(
            input.handle_key(&key(KeyCode::Enter)),
            InputEvent::Submit("trunk()".to_string())
        );
        assert_eq!(input.handle_key(&key(KeyCode::Esc)), InputEvent::Cancel);
    }

    #[test]
    fn control_keys_are_not_inserted() {
        let mut input = TextInput::with_value("", "abc");
        let ctrl_e = KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL);
        assert_eq!(input.handle_key(&ctrl_e), InputEvent::Ignored);

        let ctrl_u = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        input.handle_key(&ctrl_u);
        assert_eq!(input.value(), "");
    }

    #[test]
    fn multibyte_text() {
        let mut input = TextInput::with_value("", "héllo");
        input.handle_key(&key(KeyCode::Home));
        input.handle_key(&key(KeyCode::Right));
        input.handle_key(&key(KeyCode::Delete));
        assert_eq!(input.value(), "hllo");
    }

    #[test]
    fn line_marks_cursor() {
        let input = TextInput::with_value("> ", "ab");
        let line = input.line();

        assert_eq!(line.text(), "> ab ");
        let cursor: Vec<&Segment> = line.segments.iter().filter(|s| s.reversed).collect();
        assert_eq!(cursor.len(), 1);
        assert_eq!(cursor[0].text, " ");
    }
}
