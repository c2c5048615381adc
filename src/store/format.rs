//! File formats a store can persist to.

use std::path::Path;

use crate::codec::{self, CommentMode, Document};
use crate::error::Result;

/// Extensions stripped from store names before the format's own is added.
pub const KNOWN_EXTENSIONS: &[&str] = &["ls", "yml", "yaml", "json"];

/// A text format that documents are read from and written to.
pub trait Format {
    /// Human-readable format name.
    const NAME: &'static str;

    /// Extension used for newly resolved files.
    const EXTENSION: &'static str;

    /// Whether a file with this extension belongs to the format.
    fn accepts_extension(extension: &str) -> bool {
        extension.eq_ignore_ascii_case(Self::EXTENSION)
    }

    /// Parse the whole file text.
    fn parse(text: &str) -> Result<Document>;

    /// Render a document as file text.
    fn render(document: &Document, mode: CommentMode) -> Result<String>;
}

/// The brace-delimited format (`.ls`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Lightning;

impl Format for Lightning {
    const NAME: &'static str = "lightning";
    const EXTENSION: &'static str = "ls";

    fn parse(text: &str) -> Result<Document> {
        codec::parse_str(text)
    }

    fn render(document: &Document, mode: CommentMode) -> Result<String> {
        codec::check(document, mode)?;
        Ok(codec::write(document, mode))
    }
}

/// Which known format a path belongs to, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Lightning,
    Yaml,
}

impl FormatKind {
    pub fn detect(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        if Lightning::accepts_extension(extension) {
            Some(FormatKind::Lightning)
        } else if super::yaml::Yaml::accepts_extension(extension) {
            Some(FormatKind::Yaml)
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FormatKind::Lightning => Lightning::NAME,
            FormatKind::Yaml => super::yaml::Yaml::NAME,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn test_detect_format() {
        assert_eq!(FormatKind::detect(Path::new("a/b.ls")), Some(FormatKind::Lightning));
        assert_eq!(FormatKind::detect(Path::new("b.yml")), Some(FormatKind::Yaml));
        assert_eq!(FormatKind::detect(Path::new("b.YAML")), Some(FormatKind::Yaml));
        assert_eq!(FormatKind::detect(Path::new("b.json")), None);
        assert_eq!(FormatKind::detect(Path::new("noext")), None);
    }

    #[test]
    fn test_lightning_roundtrip_keeps_comments() {
        let text = "# c\na = 1\n\nb {\n  c = 2\n}";
        let doc = Lightning::parse(text).unwrap();
        assert_eq!(Lightning::render(&doc, CommentMode::WithComments).unwrap(), text);
    }

    #[test]
    fn test_lightning_refuses_unreadable_value() {
        let mut doc = Document::new();
        doc.insert("a", "x\ny");
        let err = Lightning::render(&doc, CommentMode::WithComments).unwrap_err();
        assert!(matches!(err, StoreError::Unwritable { ref key, .. } if key == "a"));
    }
}
