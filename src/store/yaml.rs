//! YAML persistence.
//!
//! The YAML body is read and written with `serde_yaml`, which drops
//! comments. The header (leading comment and blank lines) is kept as
//! document entries and written back above the body.

use serde_yaml::{Mapping, Value as YamlValue};

use crate::codec::{CommentMode, Document, Entry};
use crate::error::{Result, StoreError};

use super::format::Format;

/// The YAML format (`.yml`, `.yaml`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Yaml;

impl Format for Yaml {
    const NAME: &'static str = "yaml";
    const EXTENSION: &'static str = "yml";

    fn accepts_extension(extension: &str) -> bool {
        extension.eq_ignore_ascii_case("yml") || extension.eq_ignore_ascii_case("yaml")
    }

    fn parse(text: &str) -> Result<Document> {
        let mut document = read_header(text);

        let body: YamlValue = serde_yaml::from_str(text).map_err(|e| StoreError::Yaml {
            message: e.to_string(),
        })?;
        match body {
            YamlValue::Null => {}
            YamlValue::Mapping(map) => document.entries_mut().extend(mapping_entries(&map)),
            other => {
                return Err(StoreError::Yaml {
                    message: format!("top level must be a mapping, found {}", kind_of(&other)),
                })
            }
        }
        Ok(document)
    }

    fn render(document: &Document, mode: CommentMode) -> Result<String> {
        let mapping = to_mapping(document);
        let body = if mapping.is_empty() {
            String::new()
        } else {
            serde_yaml::to_string(&mapping).map_err(|e| StoreError::Yaml {
                message: e.to_string(),
            })?
        };

        if mode == CommentMode::WithoutComments {
            return Ok(body);
        }

        let mut out = String::new();
        for entry in document.entries().iter().take_while(|e| e.is_decoration()) {
            if let Entry::Comment { text, .. } = entry {
                out.push_str(text);
            }
            out.push('\n');
        }
        out.push_str(&body);
        Ok(out)
    }
}

/// Leading comment and blank lines as entries.
fn read_header(text: &str) -> Document {
    let mut document = Document::new();
    let (mut comments, mut blanks) = (0, 0);
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            document.push(Entry::Blank { ordinal: blanks });
            blanks += 1;
        } else if line.starts_with('#') {
            document.push(Entry::Comment {
                text: line.to_string(),
                ordinal: comments,
            });
            comments += 1;
        } else {
            break;
        }
    }
    document
}

fn mapping_entries(map: &Mapping) -> Vec<Entry> {
    map.iter()
        .map(|(key, value)| {
            let key = scalar_text(key);
            match value {
                YamlValue::Mapping(inner) => {
                    Entry::block(key, Document::from_entries(mapping_entries(inner)))
                }
                YamlValue::Sequence(items) => Entry::list(key, items.iter().map(scalar_text)),
                YamlValue::Tagged(tagged) => match &tagged.value {
                    YamlValue::Mapping(inner) => {
                        Entry::block(key, Document::from_entries(mapping_entries(inner)))
                    }
                    other => Entry::scalar(key, scalar_text(other)),
                },
                other => Entry::scalar(key, scalar_text(other)),
            }
        })
        .collect()
}

/// Text form of a YAML node. Nested structures inside lists are kept as
/// inline YAML.
fn scalar_text(value: &YamlValue) -> String {
    match value {
        YamlValue::Null => String::new(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::String(s) => s.clone(),
        YamlValue::Tagged(tagged) => scalar_text(&tagged.value),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn to_mapping(document: &Document) -> Mapping {
    let mut map = Mapping::new();
    for entry in document.entries() {
        let (key, value) = match entry {
            Entry::Scalar { key, value } => (key, YamlValue::String(value.clone())),
            Entry::List { key, items } => (
                key,
                YamlValue::Sequence(items.iter().cloned().map(YamlValue::String).collect()),
            ),
            Entry::Block { key, body } => (key, YamlValue::Mapping(to_mapping(body))),
            Entry::Comment { .. } | Entry::Blank { .. } => continue,
        };
        map.insert(YamlValue::String(key.clone()), value);
    }
    map
}

fn kind_of(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "null",
        YamlValue::Bool(_) => "a boolean",
        YamlValue::Number(_) => "a number",
        YamlValue::String(_) => "a string",
        YamlValue::Sequence(_) => "a sequence",
        YamlValue::Mapping(_) => "a mapping",
        YamlValue::Tagged(_) => "a tagged value",
    }
}
