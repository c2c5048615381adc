//! Ordered document model.
//!
//! A document is a sequence of entries in source order. Data entries
//! (scalars, lists, blocks) are addressed by key; comments and blank lines
//! are positional markers that only matter for writing the file back out.

/// One logical line group of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// `key = value`
    Scalar { key: String, value: String },
    /// `key = [a, b]` or the multi-line `- item` form.
    List { key: String, items: Vec<String> },
    /// `key { ... }`
    Block { key: String, body: Document },
    /// A `#` line, stored trimmed.
    Comment { text: String, ordinal: u64 },
    /// An empty line.
    Blank { ordinal: u64 },
}

impl Entry {
    pub fn scalar(key: impl Into<String>, value: impl Into<String>) -> Self {
        Entry::Scalar {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn list<I, S>(key: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Entry::List {
            key: key.into(),
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    pub fn block(key: impl Into<String>, body: Document) -> Self {
        Entry::Block {
            key: key.into(),
            body,
        }
    }

    /// The data key, or `None` for comments and blank lines.
    pub fn key(&self) -> Option<&str> {
        match self {
            Entry::Scalar { key, .. } | Entry::List { key, .. } | Entry::Block { key, .. } => {
                Some(key)
            }
            Entry::Comment { .. } | Entry::Blank { .. } => None,
        }
    }

    /// Whether this entry is a comment or blank line.
    pub fn is_decoration(&self) -> bool {
        matches!(self, Entry::Comment { .. } | Entry::Blank { .. })
    }
}

/// An ordered sequence of entries, possibly nesting further documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    entries: Vec<Entry>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut Vec<Entry> {
        &mut self.entries
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the document holds no scalars, lists or blocks.
    pub fn has_no_data(&self) -> bool {
        self.entries.iter().all(Entry::is_decoration)
    }

    /// Find a direct child entry by key.
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key() == Some(key))
    }

    pub fn entry_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.key() == Some(key))
    }

    pub(crate) fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.key() == Some(key))
    }

    /// Copy of this document with comments and blank lines removed at every depth.
    pub fn without_decorations(&self) -> Document {
        let entries = self
            .entries
            .iter()
            .filter(|e| !e.is_decoration())
            .map(|e| match e {
                Entry::Block { key, body } => Entry::block(key.clone(), body.without_decorations()),
                other => other.clone(),
            })
            .collect();
        Document { entries }
    }
}

impl FromIterator<Entry> for Document {
    fn from_iter<T: IntoIterator<Item = Entry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
