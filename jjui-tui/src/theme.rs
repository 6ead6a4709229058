//! SGR parameters for everything jjui draws itself. Graph glyphs keep the
//! colours jj emitted.

pub const CHANGE_ID: &str = "1;35";
pub const ID_REST: &str = "90";
pub const COMMIT_ID: &str = "34";
pub const AUTHOR: &str = "33";
pub const TIMESTAMP: &str = "36";
pub const BOOKMARKS: &str = "35";
pub const CONFLICT: &str = "31";
pub const EMPTY: &str = "32";
pub const NO_DESCRIPTION: &str = "33";
pub const HIDDEN: &str = "2";

/// Overlay markers such as `<< onto >>`
pub const DROP: &str = "1;31";
pub const PROMPT: &str = "1;36";
pub const TITLE: &str = "1";
pub const LIST_ITEM: &str = "";
pub const LIST_CURSOR: &str = "1;36";
pub const MARKED: &str = "32";

pub const KEY: &str = "1;36";
pub const HELP: &str = "2";
pub const RUNNING: &str = "33";
pub const SUCCESS: &str = "32";
pub const FAILURE: &str = "31";
