//! Prefixed views into a store.

use crate::error::Result;

use super::flat_file::FlatFile;
use super::format::Format;
use super::path::join;
use super::value::Value;

/// A store seen through a key prefix: `section("db").get("host")` reads `db.host`.
#[derive(Debug)]
pub struct Section<'a, F: Format> {
    store: &'a mut FlatFile<F>,
    prefix: String,
}

impl<'a, F: Format> Section<'a, F> {
    pub(crate) fn new(store: &'a mut FlatFile<F>, prefix: &str) -> Self {
        Self {
            store,
            prefix: prefix.to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn key(&self, key: &str) -> String {
        join(Some(&self.prefix), key)
    }

    pub fn get(&mut self, key: &str) -> Result<Option<Value>> {
        let key = self.key(key);
        self.store.get(&key)
    }

    pub fn get_or_set(&mut self, key: &str, default: impl Into<Value>) -> Result<Value> {
        let key = self.key(key);
        self.store.get_or_set(&key, default)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let key = self.key(key);
        self.store.set(&key, value)
    }

    pub fn contains(&mut self, key: &str) -> Result<bool> {
        let key = self.key(key);
        self.store.contains(&key)
    }

    pub fn remove(&mut self, key: &str) -> Result<Option<Value>> {
        let key = self.key(key);
        self.store.remove(&key)
    }

    /// Leaf keys below the prefix, relative to it.
    pub fn key_set(&mut self) -> Result<Vec<String>> {
        self.store.key_set_under(&self.prefix)
    }

    pub fn single_layer_key_set(&mut self) -> Result<Vec<String>> {
        self.store.single_layer_key_set_under(&self.prefix)
    }

    /// A nested section below this one.
    pub fn section(&mut self, prefix: &str) -> Section<'_, F> {
        let prefix = self.key(prefix);
        Section::new(self.store, &prefix)
    }
}
