//! Comment-preserving codec for the brace-delimited configuration format.
//!
//! # Format
//!
//! ```text
//! # comment
//! key = value
//! list = [a, b]
//! other = [
//!   - c
//!   - d
//! ]
//! block {
//!   nested = value
//! }
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use flatstore::codec::{parse_str, write, CommentMode};
//!
//! let doc = parse_str(&std::fs::read_to_string("server.ls")?)?;
//! let text = write(&doc, CommentMode::WithComments);
//! ```

mod document;
pub mod grammar;
mod parser;
mod writer;

pub use document::{Document, Entry};
pub use parser::{parse, parse_str, split_lines};
pub use writer::{check, write, CommentMode};
