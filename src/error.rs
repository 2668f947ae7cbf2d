//! Build error taxonomy.
//!
//! Every failure a rebuild can hit is typed here so the rebuild loop can log
//! it and keep watching, while one-shot commands propagate it to the CLI.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BuildError>;

/// Errors raised while assembling or watching a presentation.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Presentation folder or template file is missing. Fatal at session
    /// start; never retried.
    #[error("no such file or directory: `{0}`")]
    NotFound(PathBuf),

    /// The folder holds no content files. Fatal to a single rebuild only;
    /// the session keeps watching so a later save can supply one.
    #[error("no content files (*.md or *.html) in `{0}`")]
    EmptyInput(PathBuf),

    /// A line of the title slide header does not start with its required
    /// prefix. `line` is 1-based for user display.
    #[error("title slide line {line} must start with \"{expected}\", not \"{actual}\"")]
    MalformedHeader {
        line: usize,
        expected: &'static str,
        actual: String,
    },

    #[error("IO error on `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("file watcher error")]
    Watch(#[from] notify::Error),
}
