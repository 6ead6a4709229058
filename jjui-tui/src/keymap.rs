use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("unknown key {0:?}")]
    UnknownKey(String),
    #[error("unknown modifier {0:?}")]
    UnknownModifier(String),
}

/// One key press with modifiers, written like `ctrl+r`, `enter` or `B`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Chord {
    pub fn matches(&self, key: &KeyEvent) -> bool {
        // Terminals report SHIFT inconsistently for characters, the case
        // already carries it
        let relevant = |m: KeyModifiers| match key.code {
            KeyCode::Char(_) => m - KeyModifiers::SHIFT,
            _ => m,
        };
        self.code == key.code && relevant(self.modifiers) == relevant(key.modifiers)
    }
}

impl FromStr for Chord {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts: Vec<&str> = s.split('+').collect();
        // `+` on its own, or as the last key of a chord
        let key = if s.ends_with("++") || s == "+" {
            parts.truncate(parts.len().saturating_sub(2));
            "+"
        } else {
            parts.pop().unwrap_or_default()
        };

        let mut modifiers = KeyModifiers::NONE;
        for modifier in parts {
            modifiers |= match modifier.to_ascii_lowercase().as_str() {
                "ctrl" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                _ => return Err(KeyError::UnknownModifier(modifier.to_string())),
            };
        }

        let code = match key {
            "enter" => KeyCode::Enter,
            "esc" => KeyCode::Esc,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "pgup" => KeyCode::PageUp,
            "pgdown" => KeyCode::PageDown,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "space" | " " => KeyCode::Char(' '),
            single if single.chars().count() == 1 => {
                KeyCode::Char(single.chars().next().unwrap_or(' '))
            }
            other => return Err(KeyError::UnknownKey(other.to_string())),
        };

        Ok(Chord { code, modifiers })
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("alt+")?;
        }
        match self.code {
            KeyCode::Enter => f.write_str("enter"),
            KeyCode::Esc => f.write_str("esc"),
            KeyCode::Up => f.write_str("↑"),
            KeyCode::Down => f.write_str("↓"),
            KeyCode::Left => f.write_str("←"),
            KeyCode::Right => f.write_str("→"),
            KeyCode::PageUp => f.write_str("pgup"),
            KeyCode::PageDown => f.write_str("pgdown"),
            KeyCode::Home => f.write_str("home"),
            KeyCode::End => f.write_str("end"),
            KeyCode::Tab => f.write_str("tab"),
            KeyCode::Backspace => f.write_str("backspace"),
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            _ => f.write_str("?"),
        }
    }
}

/// All chords bound to one action
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct Binding(Vec<Chord>);

impl Binding {
    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.0.iter().any(|chord| chord.matches(key))
    }

    /// First chord, for help lines
    pub fn label(&self) -> String {
        self.0.first().map(Chord::to_string).unwrap_or_default()
    }

    /// `key help` pair for the status line
    pub fn hint(&self, help: &str) -> (String, String) {
        (self.label(), help.to_string())
    }
}

impl TryFrom<Vec<String>> for Binding {
    type Error = KeyError;

    fn try_from(chords: Vec<String>) -> Result<Self, Self::Error> {
        chords
            .iter()
            .map(|c| c.parse())
            .collect::<Result<Vec<Chord>, _>>()
            .map(Binding)
    }
}

/// Defaults are written in config syntax and are known to parse
fn bind(chords: &[&str]) -> Binding {
    Binding(chords.iter().filter_map(|c| c.parse().ok()).collect())
}

/// Bindings active when no operation intercepts the key
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Keys {
    pub up: Binding,
    pub down: Binding,
    pub page_up: Binding,
    pub page_down: Binding,
    pub top: Binding,
    pub bottom: Binding,
    pub apply: Binding,
    pub cancel: Binding,
    /// Answer a confirmation without moving to the choice
    pub yes: Binding,
    pub no: Binding,
    pub new: Binding,
    pub edit: Binding,
    pub diffedit: Binding,
    pub split: Binding,
    pub diff: Binding,
    pub abandon: Binding,
    pub undo: Binding,
    pub squash: Binding,
    pub refresh: Binding,
    pub revset: Binding,
    pub search: Binding,
    pub search_next: Binding,
    pub working_copy: Binding,
    pub quit: Binding,
    pub rebase: RebaseKeys,
    pub bookmark: BookmarkKeys,
    pub describe: DescribeKeys,
    pub details: DetailsKeys,
    pub git: GitKeys,
    pub preview: PreviewKeys,
}

impl Default for Keys {
    fn default() -> Self {
        Self {
            up: bind(&["up", "k"]),
            down: bind(&["down", "j"]),
            page_up: bind(&["pgup"]),
            page_down: bind(&["pgdown"]),
            top: bind(&["home"]),
            bottom: bind(&["end"]),
            apply: bind(&["enter"]),
            cancel: bind(&["esc"]),
            yes: bind(&["y"]),
            no: bind(&["n"]),
            new: bind(&["n"]),
            edit: bind(&["e"]),
            diffedit: bind(&["E"]),
            split: bind(&["s"]),
            diff: bind(&["d"]),
            abandon: bind(&["a"]),
            undo: bind(&["u"]),
            squash: bind(&["S"]),
            refresh: bind(&["ctrl+r"]),
            revset: bind(&["L"]),
            search: bind(&["/"]),
            search_next: bind(&["ctrl+n"]),
            working_copy: bind(&["@"]),
            quit: bind(&["q"]),
            rebase: RebaseKeys::default(),
            bookmark: BookmarkKeys::default(),
            describe: DescribeKeys::default(),
            details: DetailsKeys::default(),
            git: GitKeys::default(),
            preview: PreviewKeys::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RebaseKeys {
    pub mode: Binding,
    pub revision: Binding,
    pub branch: Binding,
    pub descendants: Binding,
    pub onto: Binding,
    pub after: Binding,
    pub before: Binding,
}

impl Default for RebaseKeys {
    fn default() -> Self {
        Self {
            mode: bind(&["r"]),
            revision: bind(&["r"]),
            branch: bind(&["B"]),
            descendants: bind(&["s"]),
            onto: bind(&["d"]),
            after: bind(&["a"]),
            before: bind(&["b"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BookmarkKeys {
    pub mode: Binding,
    pub set: Binding,
    #[serde(rename = "move")]
    pub move_: Binding,
    pub delete: Binding,
    /// Cycle through the movable bookmarks while the graph cursor stays free
    pub next: Binding,
}

impl Default for BookmarkKeys {
    fn default() -> Self {
        Self {
            mode: bind(&["b"]),
            set: bind(&["s"]),
            move_: bind(&["m"]),
            delete: bind(&["d"]),
            next: bind(&["tab"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DescribeKeys {
    pub mode: Binding,
    pub editor: Binding,
}

impl Default for DescribeKeys {
    fn default() -> Self {
        Self {
            mode: bind(&["D"]),
            editor: bind(&["ctrl+e"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DetailsKeys {
    pub mode: Binding,
    pub toggle: Binding,
    pub split: Binding,
    pub restore: Binding,
    pub diff: Binding,
}

impl Default for DetailsKeys {
    fn default() -> Self {
        Self {
            mode: bind(&["l"]),
            toggle: bind(&["m", "space"]),
            split: bind(&["s"]),
            restore: bind(&["r"]),
            diff: bind(&["d"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GitKeys {
    pub mode: Binding,
    pub push: Binding,
    pub fetch: Binding,
}

impl Default for GitKeys {
    fn default() -> Self {
        Self {
            mode: bind(&["g"]),
            push: bind(&["p"]),
            fetch: bind(&["f"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PreviewKeys {
    pub mode: Binding,
    pub scroll_up: Binding,
    pub scroll_down: Binding,
}

impl Default for PreviewKeys {
    fn default() -> Self {
        Self {
            mode: bind(&["p"]),
            scroll_up: bind(&["ctrl+u"]),
            scroll_down: bind(&["ctrl+d"]),
        }
    }
}

#[cfg(test)]
pub(crate) fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[cfg(test)]
pub(crate) fn char_key(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_chords() {
        assert_eq!(
            "ctrl+r".parse::<Chord>(),
            Ok(Chord {
                code: KeyCode::Char('r'),
                modifiers: KeyModifiers::CONTROL
            })
        );
        assert_eq!("enter".parse::<Chord>().map(|c| c.code), Ok(KeyCode::Enter));
        assert_eq!("+".parse::<Chord>().map(|c| c.code), Ok(KeyCode::Char('+')));
        assert_eq!("ctrl++".parse::<Chord>().map(|c| c.code), Ok(KeyCode::Char('+')));
        assert_eq!(
            "hyper+x".parse::<Chord>(),
            Err(KeyError::UnknownModifier("hyper".to_string()))
        );
        assert_eq!("f13x".parse::<Chord>(), Err(KeyError::UnknownKey("f13x".to_string())));
    }

    #[test]
    fn uppercase_matches_with_or_without_shift() {
        let chord: Chord = "B".parse().unwrap();
        assert!(chord.matches(&KeyEvent::new(KeyCode::Char('B'), KeyModifiers::SHIFT)));
        assert!(chord.matches(&char_key('B')));
        assert!(!chord.matches(&char_key('b')));
    }

    #[test]
    fn control_is_significant() {
        let keys = Keys::default();
        assert!(keys.refresh.matches(&KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)));
        assert!(!keys.refresh.matches(&char_key('r')));
    }

    #[test]
    fn defaults_all_parse() {
        let keys = Keys::default();
        assert!(keys.details.toggle.matches(&char_key(' ')));
        assert_eq!(keys.search_next.label(), "ctrl+n");
        assert_eq!(keys.up.label(), "↑");
    }

    #[test]
    fn deserializes_overrides() {
        let keys: Keys = toml::from_str(
            r#"
            quit = ["Q", "ctrl+c"]
            [rebase]
            onto = ["o"]
            "#,
        )
        .unwrap();

        assert!(keys.quit.matches(&char_key('Q')));
        assert!(keys.rebase.onto.matches(&char_key('o')));
        assert!(keys.rebase.after.matches(&char_key('a')));
        assert!(keys.new.matches(&char_key('n')));
    }

    #[test]
    fn confirmation_answers_are_configurable() {
        let keys: Keys = toml::from_str(r#"yes = ["o"]"#).unwrap();
        assert!(keys.yes.matches(&char_key('o')));
        assert!(!keys.yes.matches(&char_key('y')));
        assert!(keys.no.matches(&char_key('n')));
    }

    #[test]
    fn invalid_chord_fails_deserialization() {
        let result: Result<Keys, _> = toml::from_str(r#"quit = ["nope"]"#);
        assert!(result.is_err());
    }
}
