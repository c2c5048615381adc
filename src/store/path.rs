//! Dotted-key access to documents.
//!
//! A key like `server.tls.enabled` walks the blocks `server` and `tls` and
//! addresses the entry `enabled` inside the innermost one.

use crate::codec::{Document, Entry};

use super::value::Value;

/// Separator between the segments of a dotted key.
pub const PATH_SEPARATOR: char = '.';

/// Join a prefix and a key into one dotted key.
pub fn join(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}{PATH_SEPARATOR}{key}"),
        _ => key.to_string(),
    }
}

impl Document {
    /// The entry stored at a dotted key.
    pub fn lookup(&self, path: &str) -> Option<&Entry> {
        let (parents, last) = split(path);
        let mut current = self;
        for segment in parents {
            match current.entry(segment)? {
                Entry::Block { body, .. } => current = body,
                _ => return None,
            }
        }
        current.entry(last)
    }

    /// The value stored at a dotted key.
    pub fn value(&self, path: &str) -> Option<Value> {
        self.lookup(path).and_then(Value::from_entry)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    /// Store a value at a dotted key.
    ///
    /// An existing entry is replaced where it stands. Otherwise the entry is
    /// appended to its block, creating missing blocks on the way; a scalar or
    /// list standing where a block is needed is replaced by an empty block.
    pub fn insert(&mut self, path: &str, value: impl Into<Value>) {
        let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
        insert_at(self, &segments, value.into());
    }

    /// Remove the entry at a dotted key, returning its value.
    pub fn remove(&mut self, path: &str) -> Option<Value> {
        let (parents, last) = split(path);
        let mut current = self;
        for segment in parents {
            match current.entry_mut(segment)? {
                Entry::Block { body, .. } => current = body,
                _ => return None,
            }
        }
        let pos = current.position(last)?;
        let entry = current.entries_mut().remove(pos);
        Value::from_entry(&entry)
    }

    /// Every leaf key in document order.
    ///
    /// Leaves are scalars, lists and blocks without data entries.
    pub fn key_set(&self) -> Vec<String> {
        let mut keys = Vec::new();
        collect_leaf_keys(self, None, &mut keys);
        keys
    }

    /// Data keys directly at the top level.
    pub fn single_layer_key_set(&self) -> Vec<String> {
        self.entries()
            .iter()
            .filter_map(Entry::key)
            .map(str::to_string)
            .collect()
    }

    /// Leaf keys below the block at `path`, relative to that block.
    pub fn key_set_under(&self, path: &str) -> Vec<String> {
        self.section(path).map(Document::key_set).unwrap_or_default()
    }

    /// Data keys directly inside the block at `path`.
    pub fn single_layer_key_set_under(&self, path: &str) -> Vec<String> {
        self.section(path)
            .map(Document::single_layer_key_set)
            .unwrap_or_default()
    }

    /// Insert every leaf of `defaults` that is missing here.
    ///
    /// Returns the number of keys added.
    pub fn merge_defaults(&mut self, defaults: &Document) -> usize {
        let mut added = 0;
        for key in defaults.key_set() {
            if self.contains(&key) {
                continue;
            }
            if let Some(value) = defaults.value(&key) {
                self.insert(&key, value);
                added += 1;
            }
        }
        added
    }

    fn section(&self, path: &str) -> Option<&Document> {
        match self.lookup(path)? {
            Entry::Block { body, .. } => Some(body),
            _ => None,
        }
    }
}

fn split(path: &str) -> (Vec<&str>, &str) {
    match path.rsplit_once(PATH_SEPARATOR) {
        Some((parents, last)) => (parents.split(PATH_SEPARATOR).collect(), last),
        None => (Vec::new(), path),
    }
}

fn insert_at(doc: &mut Document, segments: &[&str], value: Value) {
    let Some((&key, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        let entry = value.into_entry(key);
        match doc.position(key) {
            Some(pos) => doc.entries_mut()[pos] = entry,
            None => doc.push(entry),
        }
        return;
    }

    let pos = match doc.position(key) {
        Some(pos) => {
            if !matches!(doc.entries()[pos], Entry::Block { .. }) {
                doc.entries_mut()[pos] = Entry::block(key, Document::new());
            }
            pos
        }
        None => {
            doc.push(Entry::block(key, Document::new()));
            doc.len() - 1
        }
    };

    if let Entry::Block { body, .. } = &mut doc.entries_mut()[pos] {
        insert_at(body, rest, value);
    }
}

fn collect_leaf_keys(doc: &Document, prefix: Option<&str>, keys: &mut Vec<String>) {
    for entry in doc.entries() {
        match entry {
            Entry::Scalar { key, .. } | Entry::List { key, .. } => keys.push(join(prefix, key)),
            Entry::Block { key, body } => {
                let path = join(prefix, key);
                if body.has_no_data() {
                    keys.push(path);
                } else {
                    collect_leaf_keys(body, Some(&path), keys);
                }
            }
            Entry::Comment { .. } | Entry::Blank { .. } => {}
        }
    }
}
