use serde::{Deserialize, Serialize};

/// A bookmark as listed by `jj bookmark list` with the templates in `template.rs`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub name: String,
    /// Remote name for remote-tracking entries
    pub remote: Option<String>,
    pub conflict: bool,
    /// Change id the bookmark points at, unless it is conflicted
    pub target: Option<String>,
    /// Moving it to the queried revision would move it backwards
    pub backwards: bool,
}

impl Bookmark {
    pub fn is_local(&self) -> bool {
        self.remote.is_none()
    }
}

fn optional(field: &str) -> Option<String> {
    match field.trim() {
        "" | "." => None,
        value => Some(value.to_string()),
    }
}

/// Parse `name;remote;conflict;target[;backwards]` records. Records without
/// a name are skipped.
pub fn parse_bookmarks(output: &str) -> Vec<Bookmark> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split(';');
            let name = fields.next()?.trim();
            if name.is_empty() {
                return None;
            }
            Some(Bookmark {
                name: name.to_string(),
                remote: fields.next().and_then(optional),
                conflict: fields.next().map_or(false, |f| f.trim() == "true"),
                target: fields.next().and_then(optional),
                backwards: fields.next().map_or(false, |f| f.trim() == "true"),
            })
        })
        .collect()
}

/// Local bookmarks only, deduplicated by name
pub fn local_bookmarks(bookmarks: Vec<Bookmark>) -> Vec<Bookmark> {
    let mut local: Vec<Bookmark> = Vec::new();
    for bookmark in bookmarks.into_iter().filter(Bookmark::is_local) {
        if !local.iter().any(|b| b.name == bookmark.name) {
            local.push(bookmark);
        }
    }
    local
}
