//! Values stored under dotted keys.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::codec::{Document, Entry};

/// The value found at (or written to) a dotted key.
///
/// Scalars are opaque text: numbers and booleans are stored as they print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    List(Vec<String>),
    Section(Document),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_section(&self) -> Option<&Document> {
        match self {
            Value::Section(doc) => Some(doc),
            _ => None,
        }
    }

    /// Build the entry that stores this value under `key`.
    pub(crate) fn into_entry(self, key: &str) -> Entry {
        match self {
            Value::Text(value) => Entry::scalar(key, value),
            Value::List(items) => Entry::list(key, items),
            Value::Section(body) => Entry::block(key, body),
        }
    }

    /// Read the value out of a data entry.
    pub(crate) fn from_entry(entry: &Entry) -> Option<Value> {
        match entry {
            Entry::Scalar { value, .. } => Some(Value::Text(value.clone())),
            Entry::List { items, .. } => Some(Value::List(items.clone())),
            Entry::Block { body, .. } => Some(Value::Section(body.clone())),
            Entry::Comment { .. } | Entry::Blank { .. } => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::List(items.into_iter().map(str::to_string).collect())
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Section(doc)
    }
}

macro_rules! text_value_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Text(value.to_string())
                }
            }
        )*
    };
}

text_value_from!(bool, i32, i64, u32, u64, usize, f32, f64, char);

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Text(text) => write!(f, "{text}"),
            Value::List(items) => write!(f, "[{}]", items.join(", ")),
            Value::Section(doc) => {
                let keys: Vec<&str> = doc.entries().iter().filter_map(Entry::key).collect();
                write!(f, "{{{}}}", keys.join(", "))
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Text(text) => serializer.serialize_str(text),
            Value::List(items) => items.serialize(serializer),
            Value::Section(doc) => doc.serialize(serializer),
        }
    }
}

/// Documents serialize as maps of their data entries; comments are dropped.
impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let data: Vec<(&str, Value)> = self
            .entries()
            .iter()
            .filter_map(|e| Some((e.key()?, Value::from_entry(e)?)))
            .collect();
        let mut map = serializer.serialize_map(Some(data.len()))?;
        for (key, value) in &data {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions_are_text() {
        assert_eq!(Value::from(8080), Value::Text("8080".to_string()));
        assert_eq!(Value::from(true), Value::Text("true".to_string()));
        assert_eq!(Value::from(0.5), Value::Text("0.5".to_string()));
        assert_eq!(
            Value::from(vec!["a", "b"]),
            Value::List(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_entry_roundtrip() {
        let value = Value::from(vec!["x"]);
        let entry = value.clone().into_entry("k");
        assert_eq!(entry, Entry::list("k", ["x"]));
        assert_eq!(Value::from_entry(&entry), Some(value));
        assert_eq!(Value::from_entry(&Entry::Blank { ordinal: 0 }), None);
    }

    #[test]
    fn test_serialize_section_to_json() {
        let doc = Document::from_entries(vec![
            Entry::Comment {
                text: "# skipped".to_string(),
                ordinal: 0,
            },
            Entry::scalar("host", "localhost"),
            Entry::list("ports", ["80", "443"]),
            Entry::block("tls", Document::from_entries(vec![Entry::scalar("on", "true")])),
        ]);

        let json = serde_json::to_value(Value::Section(doc)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "host": "localhost",
                "ports": ["80", "443"],
                "tls": { "on": "true" }
            })
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("v").to_string(), "v");
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), "[a, b]");
    }
}
