use serde::{Deserialize, Serialize};

/// How a revision touched a file, as printed by `jj log --summary`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
}

impl FileStatus {
    fn from_code(code: char) -> Option<Self> {
        match code {
            'A' => Some(FileStatus::Added),
            'M' => Some(FileStatus::Modified),
            'D' => Some(FileStatus::Deleted),
            'R' => Some(FileStatus::Renamed),
            'C' => Some(FileStatus::Copied),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            FileStatus::Added => 'A',
            FileStatus::Modified => 'M',
            FileStatus::Deleted => 'D',
            FileStatus::Renamed => 'R',
            FileStatus::Copied => 'C',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    pub status: FileStatus,
    /// Path as jj prints it; renames keep the `{old => new}` form
    pub path: String,
}

impl ChangedFile {
    /// Path to pass back to jj. For renames and copies that is the new name.
    pub fn target_path(&self) -> String {
        match (self.path.find('{'), self.path.find(" => "), self.path.find('}')) {
            (Some(open), Some(arrow), Some(close)) if open < arrow && arrow < close => format!(
                "{}{}{}",
                &self.path[..open],
                &self.path[arrow + 4..close],
                &self.path[close + 1..]
            ),
            _ => self.path.clone(),
        }
    }
}

/// Parse the output of [`crate::command::summary`]. Lines that do not start
/// with a known status code are skipped.
pub fn parse_summary(output: &str) -> Vec<ChangedFile> {
    output
        .lines()
        .filter_map(|line| {
            let mut chars = line.chars();
            let status = FileStatus::from_code(chars.next()?)?;
            let path = chars.as_str().strip_prefix(' ')?.trim_end();
            (!path.is_empty()).then(|| ChangedFile {
                status,
                path: path.to_string(),
            })
        })
        .collect()
}
