//! jj templates whose output the parsers in this workspace rely on.
//!
//! Changing the field order here means changing `graph::Commit::from_fields`
//! and the parsers in `bookmark.rs` as well.

/// One `;`-separated record per revision, in the order `Commit::from_fields` reads them
pub const DISPLAY: &str = concat!(
    r#"change_id.shortest(1) ++ ";" ++ "#,
    r#"change_id.shortest(8) ++ ";" ++ "#,
    r#"parents.map(|p| p.change_id().shortest(8)).join(",") ++ ";" ++ "#,
    r#"if(bookmarks, bookmarks.map(|b| b.name()).join(","), ".") ++ ";" ++ "#,
    r#"current_working_copy ++ ";" ++ "#,
    r#"immutable ++ ";" ++ "#,
    r#"conflict ++ ";" ++ "#,
    r#"empty ++ ";" ++ "#,
    r#"author.email() ++ ";" ++ "#,
    r#"committer.timestamp().ago() ++ ";" ++ "#,
    r#"description.first_line() ++ ";" ++ "#,
    r#"commit_id.shortest(1) ++ ";" ++ "#,
    r#"commit_id.shortest(8) ++ ";" ++ "#,
    r#"hidden"#,
);

/// `name;remote;conflict;target` per bookmark, `.` standing in for "none"
pub const BOOKMARK_LIST: &str = concat!(
    r#"name ++ ";" ++ "#,
    r#"if(remote, remote, ".") ++ ";" ++ "#,
    r#"conflict ++ ";" ++ "#,
    r#"if(normal_target, normal_target.change_id().shortest(8), ".") ++ "\n""#,
);

/// Like [`BOOKMARK_LIST`] with a fifth field telling whether moving the
/// bookmark to `revision` would move it backwards
pub fn movable_bookmarks(revision: &str) -> String {
    format!(
        concat!(
            r#"name ++ ";" ++ "#,
            r#"if(remote, remote, ".") ++ ";" ++ "#,
            r#"conflict ++ ";" ++ "#,
            r#"if(normal_target, normal_target.change_id().shortest(8), ".") ++ ";" ++ "#,
            r#"if(normal_target, normal_target.contained_in("{}::"), false) ++ "\n""#,
        ),
        revision
    )
}
