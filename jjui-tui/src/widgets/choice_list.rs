use crossterm::event::{KeyCode, KeyEvent};
use graph::{Line, Segment};

use crate::keymap::Keys;
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEvent {
    /// Enter on the item at this index
    Chosen(usize),
    Cancel,
    Moved,
    Ignored,
}

/// Vertical list of items with a cursor and optional marks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceList<T> {
    title: Option<String>,
    items: Vec<T>,
    labels: Vec<String>,
    marked: Vec<bool>,
    cursor: usize,
}

impl<T> ChoiceList<T> {
    pub fn new(items: Vec<T>, label: impl Fn(&T) -> String) -> Self {
        let labels = items.iter().map(label).collect();
        Self {
            title: None,
            marked: vec![false; items.len()],
            items,
            labels,
            cursor: 0,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&T> {
        self.items.get(self.cursor)
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.items.len() {
            self.cursor += 1;
        }
    }

    /// Move down, wrapping around at the end
    pub fn cycle(&mut self) {
        if !self.items.is_empty() {
            self.cursor = (self.cursor + 1) % self.items.len();
        }
    }

    pub fn toggle(&mut self) {
        if let Some(mark) = self.marked.get_mut(self.cursor) {
            *mark = !*mark;
        }
    }

    pub fn marked(&self) -> impl Iterator<Item = &T> {
        self.items
            .iter()
            .zip(&self.marked)
            .filter(|(_, marked)| **marked)
            .map(|(item, _)| item)
    }

    pub fn handle_key(&mut self, key: &KeyEvent, keys: &Keys) -> ListEvent {
        if keys.up.matches(key) {
            self.move_up();
            ListEvent::Moved
        } else if keys.down.matches(key) {
            self.move_down();
            ListEvent::Moved
        } else if keys.apply.matches(key) {
            if self.items.is_empty() {
                ListEvent::Ignored
            } else {
                ListEvent::Chosen(self.cursor)
            }
        } else if keys.cancel.matches(key) || key.code == KeyCode::Esc {
            ListEvent::Cancel
        } else {
            ListEvent::Ignored
        }
    }

    pub fn lines(&self) -> Vec<Line> {
        let mut lines = Vec::with_capacity(self.items.len() + 1);
        if let Some(title) = &self.title {
            lines.push(Line::new(vec![Segment::new(title.as_str(), theme::TITLE)]));
        }
        for (i, label) in self.labels.iter().enumerate() {
            let mut line = Line::default();
            let (pointer, params) = if i == self.cursor {
                ("> ", theme::LIST_CURSOR)
            } else {
                ("  ", theme::LIST_ITEM)
            };
            line.push(Segment::new(pointer, params));
            if self.marked[i] {
                line.push(Segment::new("✓ ", theme::MARKED));
            }
            line.push(Segment::new(label.as_str(), params));
            lines.push(line);
        }
        lines
    }
}

impl ChoiceList<bool> {
    /// `Yes`/`No` list, `Yes` first
    pub fn confirmation(title: impl Into<String>) -> Self {
        ChoiceList::new(vec![true, false], |yes| {
            String::from(if *yes { "Yes" } else { "No" })
        })
        .with_title(title)
    }

    pub fn answer(&self) -> bool {
        self.current().copied().unwrap_or(false)
    }
}
