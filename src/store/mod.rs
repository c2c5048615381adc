//! Flat-file stores: dotted-key access to a document kept in sync with a file.
//!
//! # Example
//!
//! ```ignore
//! use flatstore::store::{FlatFile, Lightning};
//!
//! let mut config = FlatFile::<Lightning>::open("config", Some(Path::new("data")))?;
//! config.set("server.port", 8080)?;
//! let port = config.get("server.port")?;
//! ```

pub mod file;
mod flat_file;
mod format;
mod header;
mod path;
mod section;
mod value;
mod yaml;

pub use flat_file::FlatFile;
pub use format::{Format, FormatKind, Lightning, KNOWN_EXTENSIONS};
pub use header::frame;
pub use path::{join, PATH_SEPARATOR};
pub use section::Section;
pub use value::Value;
pub use yaml::Yaml;
