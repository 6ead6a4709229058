use smallvec::SmallVec;

use crate::error::ParseError;

/// Change id jj reserves for the synthetic root of every repository
pub const ROOT_CHANGE_ID: &str = "zzzzzzzz";

/// Separator between the positional fields of the display template
pub const FIELD_SEPARATOR: char = ';';

/// Field placeholder the template emits for a revision without bookmarks
pub const NO_BOOKMARKS: &str = ".";

/// Number of fields the display template emits per revision
const TEMPLATE_FIELDS: usize = 14;

/// A changeset as reported by the display template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commit {
    pub change_id_short: String,
    pub change_id: String,
    pub commit_id_short: String,
    pub commit_id: String,
    /// Change ids of the parents
    pub parents: SmallVec<[String; 2]>,
    pub bookmarks: Vec<String>,
    pub is_working_copy: bool,
    pub immutable: bool,
    pub conflict: bool,
    pub empty: bool,
    pub hidden: bool,
    pub author: String,
    pub timestamp: String,
    /// First line of the description
    pub description: String,
    /// Position in the snapshot
    pub index: usize,
}

impl Commit {
    /// Parse the `;`-separated payload of a node line.
    ///
    /// Only the two change id fields are mandatory; every other field falls
    /// back to its zero value. `line` is the 1-based input line for errors.
    pub fn from_fields(line: usize, payload: &str) -> Result<Self, ParseError> {
        let parts: Vec<&str> = payload.split(FIELD_SEPARATOR).collect();

        let id = |i: usize| match parts.get(i).map(|p| p.trim()) {
            Some(id) if !id.is_empty() => Ok(id.to_string()),
            _ => Err(ParseError::MissingChangeId {
                line,
                text: payload.to_string(),
            }),
        };
        let change_id_short = id(0)?;
        let change_id = id(1)?;

        let field = |i: usize| parts.get(i).copied().unwrap_or("");
        let flag = |i: usize| field(i).trim() == "true";

        // A description containing the separator spills into extra fields
        let (description, trailer) = if parts.len() > TEMPLATE_FIELDS {
            let end = parts.len() - (TEMPLATE_FIELDS - 11);
            (parts[10..end].join(";"), end)
        } else {
            (field(10).to_string(), 11)
        };
        let trailing = |offset: usize| parts.get(trailer + offset).copied().unwrap_or("");

        let mut commit = Commit {
            change_id_short,
            change_id,
            parents: split_list(field(2)).collect(),
            bookmarks: match field(3).trim() {
                NO_BOOKMARKS => Vec::new(),
                list => split_list(list).collect(),
            },
            is_working_copy: flag(4),
            immutable: flag(5),
            conflict: flag(6),
            empty: flag(7),
            author: field(8).trim().to_string(),
            timestamp: field(9).trim().to_string(),
            description,
            commit_id_short: trailing(0).trim().to_string(),
            commit_id: trailing(1).trim().to_string(),
            hidden: trailing(2).trim() == "true",
            index: 0,
        };

        if commit.is_root() {
            commit.normalize_root();
        }
        Ok(commit)
    }

    pub fn is_root(&self) -> bool {
        self.change_id == ROOT_CHANGE_ID
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// The root is never a real changeset, whatever the template printed
    fn normalize_root(&mut self) {
        self.parents.clear();
        self.immutable = false;
        self.conflict = false;
        self.description.clear();
    }
}

fn split_list(field: &str) -> impl Iterator<Item = String> + '_ {
    field
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
