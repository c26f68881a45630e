use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced while building a cloud or loading its inputs.
///
/// Missing frequency entries are not errors (they resolve to a count of 1);
/// everything here is a caller configuration problem and is reported
/// immediately, never retried.
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("icon pool is empty: at least one icon reference is required")]
    EmptyIconPool,

    #[error("invalid color '{0}': expected #RGB, #RGBA, #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
