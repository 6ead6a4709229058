use unicode_width::UnicodeWidthChar;

use super::segment::{Background, Segment};

/// Glyphs that keep a lane running into the next terminal line
const DOWNWARD_GLYPHS: &[char] = &['│', '├', '┤', '┼', '╭', '╮', '┬', '|', '@', '○', '◆', '×', '◉', '●'];

/// One terminal line worth of styled segments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub segments: Vec<Segment>,
}

impl Line {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Append a segment, folding it into the previous one when the style matches
    pub fn push(&mut self, segment: Segment) {
        if segment.text.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(last) if last.style_eq(&segment) => last.text.push_str(&segment.text),
            _ => self.segments.push(segment),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.text.is_empty())
    }

    /// Plain text with every style stripped
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Display width in terminal columns
    pub fn width(&self) -> usize {
        self.segments
            .iter()
            .flat_map(|s| s.text.chars())
            .map(|c| c.width().unwrap_or(0))
            .sum()
    }

    /// Split into the first `column` display columns and the remainder
    pub fn split_at_column(&self, column: usize) -> (Line, Line) {
        let mut head = Line::default();
        let mut tail = Line::default();
        let mut used = 0;

        for segment in &self.segments {
            if used >= column {
                tail.push(segment.clone());
                continue;
            }
            let mut split = segment.text.len();
            for (i, c) in segment.text.char_indices() {
                let w = c.width().unwrap_or(0);
                if used + w > column {
                    split = i;
                    break;
                }
                used += w;
            }
            let (left, right) = segment.text.split_at(split);
            head.push(Segment {
                text: left.to_string(),
                ..segment.clone()
            });
            tail.push(Segment {
                text: right.to_string(),
                ..segment.clone()
            });
            if split < segment.text.len() {
                used = column;
            }
        }
        (head, tail)
    }

    /// Gutter of this line re-indented to `indent` columns as one segment.
    ///
    /// Lanes that run downwards become `│`, everything else is blanked, so the
    /// result can sit below or above a node without breaking its connectors.
    pub fn extend(&self, indent: usize) -> Line {
        if indent == 0 {
            return Line::default();
        }
        let (gutter, _) = self.split_at_column(indent);
        let mut text = String::with_capacity(indent);
        let mut width = 0;
        for c in gutter.text().chars() {
            let w = c.width().unwrap_or(0);
            if DOWNWARD_GLYPHS.contains(&c) {
                text.push('│');
            } else {
                text.extend(std::iter::repeat(' ').take(w));
            }
            width += w;
        }
        text.extend(std::iter::repeat(' ').take(indent.saturating_sub(width)));

        let params = gutter
            .segments
            .iter()
            .find(|s| s.text.chars().any(|c| DOWNWARD_GLYPHS.contains(&c)))
            .or(gutter.segments.first())
            .map(|s| s.params.clone())
            .unwrap_or_default();

        Line::new(vec![Segment::new(text, params)])
    }

    /// Invert the first occurrence of `needle` inside each segment
    pub fn reverse(&self, needle: &str) -> Line {
        let mut line = Line::default();
        for segment in &self.segments {
            line.segments.extend(segment.reverse(needle));
        }
        line
    }

    pub fn with_background(&self, background: &Background) -> Line {
        Line::new(
            self.segments
                .iter()
                .map(|s| s.with_background(background))
                .collect(),
        )
    }
}

/// Lazily splits ANSI-coloured text into lines of segments in a single pass.
///
/// Style state carries across line breaks the way a terminal would apply it.
pub struct Lines<'a> {
    rest: &'a str,
    params: String,
}

pub fn lines(input: &str) -> Lines<'_> {
    Lines {
        rest: input,
        params: String::new(),
    }
}

impl<'a> Lines<'a> {
    fn apply_sgr(&mut self, sgr: &str) {
        let mut codes = sgr.split(';').peekable();
        if sgr.is_empty() || codes.peek() == Some(&"0") {
            self.params.clear();
            codes.next();
        }
        for code in codes.filter(|c| !c.is_empty()) {
            if !self.params.is_empty() {
                self.params.push(';');
            }
            self.params.push_str(code);
        }
    }

    fn flush(&self, line: &mut Line, text: &mut String) {
        if !text.is_empty() {
            line.push(Segment::new(std::mem::take(text), self.params.clone()));
        }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        if self.rest.is_empty() {
            return None;
        }

        let input = self.rest;
        let mut line = Line::default();
        let mut text = String::new();
        let mut pos = 0;

        while let Some(c) = input[pos..].chars().next() {
            match c {
                '\n' => {
                    self.flush(&mut line, &mut text);
                    self.rest = &input[pos + 1..];
                    return Some(line);
                }
                '\x1b' => {
                    let (len, sgr) = escape_sequence(&input[pos..]);
                    if let Some(sgr) = sgr {
                        self.flush(&mut line, &mut text);
                        self.apply_sgr(sgr);
                    }
                    pos += len;
                }
                '\r' => pos += 1,
                c => {
                    text.push(c);
                    pos += c.len_utf8();
                }
            }
        }

        self.flush(&mut line, &mut text);
        self.rest = "";
        if line.is_empty() {
            None
        } else {
            Some(line)
        }
    }
}

/// Length in bytes of the escape sequence at the start of `s`, plus its SGR
/// parameters when it is one. Other sequences are skipped.
fn escape_sequence(s: &str) -> (usize, Option<&str>) {
    let bytes = s.as_bytes();
    match bytes.get(1) {
        Some(b'[') => {
            let mut i = 2;
            while i < bytes.len() && (0x30..=0x3f).contains(&bytes[i]) {
                i += 1;
            }
            let params_end = i;
            while i < bytes.len() && (0x20..=0x2f).contains(&bytes[i]) {
                i += 1;
            }
            match bytes.get(i) {
                Some(b'm') => (i + 1, Some(&s[2..params_end])),
                Some(b) if (0x40..=0x7e).contains(b) => (i + 1, None),
                _ => (i, None),
            }
        }
        Some(b']') => {
            // OSC, terminated by BEL or ST
            let mut i = 2;
            while i < bytes.len() {
                match bytes[i] {
                    0x07 => return (i + 1, None),
                    0x1b if bytes.get(i + 1) == Some(&b'\\') => return (i + 2, None),
                    _ => i += 1,
                }
            }
            (i, None)
        }
        Some(_) => (1 + s[1..].chars().next().map_or(0, char::len_utf8), None),
        None => (1, None),
    }
}
