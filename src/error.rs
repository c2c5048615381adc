use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for flatstore operations
#[derive(Error, Diagnostic, Debug)]
pub enum StoreError {
    #[error("Line {line}: block closed without being opened")]
    #[diagnostic(
        code(flatstore::parse::unopened_block_close),
        help("Remove the stray `}}` or open a block with `key {{`")
    )]
    UnopenedBlockClose { line: usize },

    #[error("Line {line}: block is never closed")]
    #[diagnostic(
        code(flatstore::parse::unterminated_block),
        help("Add a line containing only `}}` after the block body")
    )]
    UnterminatedBlock { line: usize },

    #[error("Line {line}: list is not closed properly")]
    #[diagnostic(
        code(flatstore::parse::unterminated_list),
        help("Every list line must start with `- ` and the list must end with `]`")
    )]
    UnterminatedList { line: usize },

    #[error("Line {line}: '{content}' has neither a value nor a block")]
    #[diagnostic(
        code(flatstore::parse::expected_value_or_block),
        help("Use `key = value`, or follow the key with a line opening a block")
    )]
    ExpectedValueOrBlock { line: usize, content: String },

    #[error("Line {line}: block opened without a key")]
    #[diagnostic(
        code(flatstore::parse::missing_block_key),
        help("Put the block key on the line before `{{`, or write `key {{`")
    )]
    MissingBlockKey { line: usize },

    #[error("Cannot write '{key}': {reason}")]
    #[diagnostic(
        code(flatstore::write::unwritable),
        help("Keys and values must fit on one line, must not contain `}}`, and values must not start with `[` or end with `{{`")
    )]
    Unwritable { key: String, reason: &'static str },

    #[error("Invalid YAML: {message}")]
    #[diagnostic(code(flatstore::parse::yaml))]
    Yaml { message: String },

    #[error("Could not read '{}'", path.display())]
    #[diagnostic(code(flatstore::io::read))]
    Read { path: PathBuf },

    #[error("Could not write '{}': {message}", path.display())]
    #[diagnostic(code(flatstore::io::write))]
    Write { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    #[diagnostic(code(flatstore::io))]
    IoError(#[from] std::io::Error),

    #[error("Invalid file extension for {format} file '{}'", path.display())]
    #[diagnostic(code(flatstore::file::extension))]
    InvalidExtension {
        path: PathBuf,
        format: &'static str,
        #[help]
        help: Option<String>,
    },

    #[error("File name must not be empty")]
    #[diagnostic(code(flatstore::file::name))]
    EmptyName,

    #[error("{message}")]
    #[diagnostic(code(flatstore::command))]
    Command {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Settings error: {message}")]
    #[diagnostic(code(flatstore::settings))]
    Settings {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl StoreError {
    /// Whether this error describes malformed file content rather than I/O.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            StoreError::UnopenedBlockClose { .. }
                | StoreError::UnterminatedBlock { .. }
                | StoreError::UnterminatedList { .. }
                | StoreError::ExpectedValueOrBlock { .. }
                | StoreError::MissingBlockKey { .. }
                | StoreError::Yaml { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
