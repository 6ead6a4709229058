use std::io;

use thiserror::Error;

/// Failure to run jj at all. A jj invocation that runs and exits non-zero is
/// not an error: it comes back as an unsuccessful `CommandOutput`.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("i/o error while running jj: {0}")]
    Io(#[from] io::Error),
}
