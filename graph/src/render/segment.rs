use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::error::StyleError;

/// A run of text rendered with a single SGR parameter string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segment {
    /// Literal text, never containing a line break except the bare `"\n"` segment
    pub text: String,
    /// Raw SGR parameters, e.g. `"1;38;5;5"`. Empty means default style.
    pub params: String,
    /// Cursor/search inversion marker
    pub reversed: bool,
}

impl Segment {
    pub fn new(text: impl Into<String>, params: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: params.into(),
            reversed: false,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, "")
    }

    /// Split around the first occurrence of `needle`, marking only the match as
    /// reversed. Empty parts are dropped; without a match the segment comes back
    /// whole and untouched.
    pub fn reverse(&self, needle: &str) -> SmallVec<[Segment; 3]> {
        let mut parts = SmallVec::new();
        let index = match self.text.find(needle) {
            Some(index) if !needle.is_empty() && self.text != "\n" => index,
            _ => {
                parts.push(self.clone());
                return parts;
            }
        };

        let (before, rest) = self.text.split_at(index);
        let after = &rest[needle.len()..];

        for (text, reversed) in [(before, false), (needle, true), (after, false)] {
            if text.is_empty() {
                continue;
            }
            parts.push(Segment {
                text: text.to_string(),
                params: self.params.clone(),
                reversed,
            });
        }
        parts
    }

    /// Replace any background code with `background`, keeping every other code
    pub fn with_background(&self, background: &Background) -> Segment {
        let mut kept: Vec<&str> = Vec::new();
        let parts: Vec<&str> = self.params.split(';').collect();

        let mut i = 0;
        while i < parts.len() {
            let Ok(code) = parts[i].parse::<u8>() else {
                i += 1;
                continue;
            };
            // 38/48 carry their colour as trailing arguments: 5;n or 2;r;g;b
            let span = match (code, parts.get(i + 1).copied()) {
                (38 | 48, Some("5")) => 3,
                (38 | 48, Some("2")) => 5,
                _ => 1,
            };
            let end = (i + span).min(parts.len());
            if !is_background(code) {
                kept.extend_from_slice(&parts[i..end]);
            }
            i = end;
        }

        kept.extend(background.codes().split(';'));

        Segment {
            text: self.text.clone(),
            params: kept.join(";"),
            reversed: self.reversed,
        }
    }

    pub fn style_eq(&self, other: &Segment) -> bool {
        self.params == other.params && self.reversed == other.reversed
    }
}

fn is_background(code: u8) -> bool {
    (40..=49).contains(&code) || (100..=109).contains(&code)
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text == "\n" {
            return f.write_str(&self.text);
        }
        match (self.params.is_empty(), self.reversed) {
            (true, false) => f.write_str(&self.text),
            (true, true) => write!(f, "\x1b[7m{}\x1b[0m", self.text),
            (false, false) => write!(f, "\x1b[{}m{}\x1b[0m", self.params, self.text),
            (false, true) => write!(f, "\x1b[{}m\x1b[7m{}\x1b[0m", self.params, self.text),
        }
    }
}

/// Validated background SGR codes, e.g. `"48;5;237"` or `"44"`.
///
/// Parsing happens once when the configuration is applied; a bad token there is
/// an authoring error of the theme, not something to recover from per segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Background(String);

impl Background {
    pub fn codes(&self) -> &str {
        &self.0
    }
}

impl FromStr for Background {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for part in s.split(';') {
            if part.parse::<u8>().is_err() {
                return Err(StyleError::InvalidBackground(part.to_string()));
            }
        }
        Ok(Background(s.to_string()))
    }
}
