//! flatstore - Dotted-key configuration storage on flat files
//!
//! A library for reading and writing hierarchical configuration kept in a
//! brace-delimited text format (or YAML), preserving comments and blank
//! lines across rewrites.

pub mod cli;
pub mod codec;
pub mod error;
pub mod output;
pub mod settings;
pub mod store;

pub use codec::{parse, parse_str, write, CommentMode, Document, Entry};
pub use error::{Result, StoreError};
pub use settings::{ReloadPolicy, StoreSettings, SETTINGS_FILENAME};
pub use store::{FlatFile, Format, FormatKind, Lightning, Section, Value, Yaml};
