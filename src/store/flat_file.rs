//! A document cached in memory and kept in sync with one file.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::codec::{CommentMode, Document};
use crate::error::{Result, StoreError};
use crate::settings::{ReloadPolicy, StoreSettings};

use super::file;
use super::format::Format;
use super::section::Section;
use super::value::Value;

/// Dotted-key storage backed by a single file in format `F`.
///
/// Reads apply the reload policy first, so they take `&mut self`. Every
/// mutation is written to disk before it returns. Share a store between
/// threads by wrapping it in a lock.
#[derive(Debug)]
pub struct FlatFile<F: Format> {
    path: PathBuf,
    settings: StoreSettings,
    document: Document,
    loaded_at: Option<SystemTime>,
    format: PhantomData<fn() -> F>,
}

impl<F: Format> FlatFile<F> {
    /// Open (creating if needed) `<dir>/<name>.<ext>` with default settings.
    pub fn open(name: &str, dir: Option<&Path>) -> Result<Self> {
        Self::open_with(name, dir, StoreSettings::default())
    }

    pub fn open_with(name: &str, dir: Option<&Path>, settings: StoreSettings) -> Result<Self> {
        let path = file::resolve(name, dir, F::EXTENSION)?;
        Self::load(path, settings, None)
    }

    /// Open a store, seeding a newly created file with `defaults`.
    pub fn with_defaults(
        name: &str,
        dir: Option<&Path>,
        defaults: &str,
        settings: StoreSettings,
    ) -> Result<Self> {
        let path = file::resolve(name, dir, F::EXTENSION)?;
        Self::load(path, settings, Some(defaults))
    }

    /// Open the store at an explicit path, which must carry the format's extension.
    pub fn from_path(path: impl Into<PathBuf>, settings: StoreSettings) -> Result<Self> {
        let path = path.into();
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !F::accepts_extension(extension) {
            return Err(StoreError::InvalidExtension {
                path,
                format: F::NAME,
                help: Some(format!("Use a .{} file", F::EXTENSION)),
            });
        }
        Self::load(path, settings, None)
    }

    fn load(path: PathBuf, settings: StoreSettings, seed: Option<&str>) -> Result<Self> {
        if file::create(&path)? {
            debug!(path = %path.display(), "created store file");
            if let Some(seed) = seed {
                file::write(&path, seed)?;
            }
        }

        let mut store = Self {
            path,
            settings,
            document: Document::new(),
            loaded_at: None,
            format: PhantomData,
        };
        store.force_reload()?;
        Ok(store)
    }

    // ------------------------------------------------------------------
    // Reading
    // ------------------------------------------------------------------

    pub fn get(&mut self, key: &str) -> Result<Option<Value>> {
        self.reload_if_needed()?;
        Ok(self.document.value(key))
    }

    /// Value at `key`, storing `default` there first if the key is missing.
    pub fn get_or_set(&mut self, key: &str, default: impl Into<Value>) -> Result<Value> {
        self.reload_if_needed()?;
        if let Some(value) = self.document.value(key) {
            return Ok(value);
        }
        let default = default.into();
        let mut document = self.document.clone();
        document.insert(key, default.clone());
        self.commit(document)?;
        Ok(default)
    }

    pub fn get_all(&mut self, keys: &[&str]) -> Result<Vec<Option<Value>>> {
        self.reload_if_needed()?;
        Ok(keys.iter().map(|key| self.document.value(key)).collect())
    }

    pub fn contains(&mut self, key: &str) -> Result<bool> {
        self.reload_if_needed()?;
        Ok(self.document.contains(key))
    }

    pub fn key_set(&mut self) -> Result<Vec<String>> {
        self.reload_if_needed()?;
        Ok(self.document.key_set())
    }

    pub fn key_set_under(&mut self, key: &str) -> Result<Vec<String>> {
        self.reload_if_needed()?;
        Ok(self.document.key_set_under(key))
    }

    pub fn single_layer_key_set(&mut self) -> Result<Vec<String>> {
        self.reload_if_needed()?;
        Ok(self.document.single_layer_key_set())
    }

    pub fn single_layer_key_set_under(&mut self, key: &str) -> Result<Vec<String>> {
        self.reload_if_needed()?;
        Ok(self.document.single_layer_key_set_under(key))
    }

    /// The whole cached document.
    pub fn data(&mut self) -> Result<&Document> {
        self.reload_if_needed()?;
        Ok(&self.document)
    }

    pub fn header(&mut self) -> Result<Vec<String>> {
        self.reload_if_needed()?;
        Ok(self.document.header())
    }

    // ------------------------------------------------------------------
    // Writing
    // ------------------------------------------------------------------

    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.reload_if_needed()?;
        let mut document = self.document.clone();
        document.insert(key, value);
        self.commit(document)
    }

    /// Insert many values with a single write.
    pub fn put_all<K, V, I>(&mut self, values: I) -> Result<()>
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.reload_if_needed()?;
        let mut document = self.document.clone();
        for (key, value) in values {
            document.insert(key.as_ref(), value);
        }
        self.commit(document)
    }

    pub fn remove(&mut self, key: &str) -> Result<Option<Value>> {
        self.reload_if_needed()?;
        let removed = self.document.remove(key);
        if removed.is_some() {
            self.write()?;
        }
        Ok(removed)
    }

    /// Remove several keys with a single write. Returns how many existed.
    pub fn remove_all(&mut self, keys: &[&str]) -> Result<usize> {
        self.reload_if_needed()?;
        let removed = keys
            .iter()
            .filter(|key| self.document.remove(key).is_some())
            .count();
        if removed > 0 {
            self.write()?;
        }
        Ok(removed)
    }

    /// Drop all content, comments included.
    pub fn clear(&mut self) -> Result<()> {
        self.document = Document::new();
        self.write()
    }

    /// Add every key of `defaults` that this store lacks. Returns how many were added.
    pub fn add_defaults(&mut self, defaults: &Document) -> Result<usize> {
        self.reload_if_needed()?;
        let mut document = self.document.clone();
        let added = document.merge_defaults(defaults);
        if added > 0 {
            self.commit(document)?;
        }
        Ok(added)
    }

    pub fn add_defaults_from<G: Format>(&mut self, other: &mut FlatFile<G>) -> Result<usize> {
        let defaults = other.data()?.clone();
        self.add_defaults(&defaults)
    }

    pub fn set_header<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<()> {
        self.reload_if_needed()?;
        let mut document = self.document.clone();
        document.set_header(lines);
        self.commit(document)
    }

    pub fn add_header<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<()> {
        self.reload_if_needed()?;
        let mut document = self.document.clone();
        document.add_header(lines);
        self.commit(document)
    }

    pub fn framed_header<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<()> {
        self.reload_if_needed()?;
        let mut document = self.document.clone();
        document.framed_header(lines);
        self.commit(document)
    }

    /// Replace text in the raw file, then reload it.
    pub fn replace(&mut self, target: &str, replacement: &str) -> Result<()> {
        let text = file::read(&self.path)?;
        file::write(&self.path, &text.replace(target, replacement))?;
        self.force_reload()
    }

    /// Write the cached document to disk.
    pub fn write(&mut self) -> Result<()> {
        let text = F::render(&self.document, self.settings.comments)?;
        self.store_text(&text)
    }

    /// Render `document` and, only if that succeeds, make it the cached one and write it.
    fn commit(&mut self, document: Document) -> Result<()> {
        let text = F::render(&document, self.settings.comments)?;
        self.document = document;
        self.store_text(&text)
    }

    fn store_text(&mut self, text: &str) -> Result<()> {
        file::write(&self.path, text)?;
        self.loaded_at = file::modified(&self.path);
        debug!(path = %self.path.display(), bytes = text.len(), "wrote store file");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Reloading
    // ------------------------------------------------------------------

    /// Re-read and re-parse the file regardless of the reload policy.
    pub fn force_reload(&mut self) -> Result<()> {
        let text = file::read(&self.path)?;
        self.document = F::parse(&text)?;
        self.loaded_at = file::modified(&self.path);
        debug!(
            path = %self.path.display(),
            format = F::NAME,
            entries = self.document.len(),
            "loaded store file"
        );
        Ok(())
    }

    /// Whether the file was modified since it was last loaded or written.
    pub fn has_changed(&self) -> bool {
        match (file::modified(&self.path), self.loaded_at) {
            (Some(now), Some(then)) => now != then,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    fn should_reload(&self) -> bool {
        match self.settings.reload {
            ReloadPolicy::Never => false,
            ReloadPolicy::Always => true,
            ReloadPolicy::OnChange => self.has_changed(),
        }
    }

    fn reload_if_needed(&mut self) -> Result<()> {
        if self.should_reload() {
            debug!(path = %self.path.display(), policy = ?self.settings.reload, "reloading");
            self.force_reload()?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Misc
    // ------------------------------------------------------------------

    /// A view of this store with every key prefixed by `prefix`.
    pub fn section(&mut self, prefix: &str) -> Section<'_, F> {
        Section::new(self, prefix)
    }

    /// File name including extension.
    pub fn name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> StoreSettings {
        self.settings
    }

    pub fn set_reload_policy(&mut self, reload: ReloadPolicy) {
        self.settings.reload = reload;
    }

    pub fn set_comment_mode(&mut self, comments: CommentMode) {
        self.settings.comments = comments;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Lightning, Yaml};
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    /// Rewrite a file behind the store's back with a distinct mtime.
    fn touch_with(path: &Path, text: &str) {
        fs::write(path, text).unwrap();
        let later = SystemTime::now() + Duration::from_secs(5);
        fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(later)
            .unwrap();
    }

    #[test]
    fn test_open_creates_file() {
        let dir = tempdir().unwrap();
        let store = FlatFile::<Lightning>::open("config", Some(dir.path())).unwrap();

        assert!(dir.path().join("config.ls").exists());
        assert_eq!(store.name(), "config.ls");
    }

    #[test]
    fn test_set_get_roundtrip_through_disk() {
        let dir = tempdir().unwrap();
        let mut store = FlatFile::<Lightning>::open("config", Some(dir.path())).unwrap();

        store.set("server.port", 8080).unwrap();
        store.set("server.hosts", vec!["a", "b"]).unwrap();
        store.set("name", "demo").unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            text,
            "server {\n  port = 8080\n  hosts = [\n    - a\n    - b\n  ]\n}\nname = demo"
        );

        let mut reopened = FlatFile::<Lightning>::open("config", Some(dir.path())).unwrap();
        assert_eq!(reopened.get("server.port").unwrap(), Some(Value::from("8080")));
        assert!(reopened.contains("server.hosts").unwrap());
        assert!(!reopened.contains("server.missing").unwrap());
    }

    #[test]
    fn test_comments_survive_set() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.ls");
        fs::write(&path, "# App settings\n\nname = demo\n# the port\nport = 1").unwrap();

        let mut store = FlatFile::<Lightning>::from_path(&path, StoreSettings::default()).unwrap();
        store.set("port", 2).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# App settings\n\nname = demo\n# the port\nport = 2"
        );
    }

    #[test]
    fn test_without_comments_mode_strips_on_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.ls");
        fs::write(&path, "# gone\na = 1\nb {\n  # gone too\n  c = 2\n}").unwrap();

        let settings = StoreSettings::default().with_comments(CommentMode::WithoutComments);
        let mut store = FlatFile::<Lightning>::from_path(&path, settings).unwrap();
        store.set("d", "x").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "a = 1\n\nb {\n  c = 2\n}\n\nd = x"
        );
    }

    #[test]
    fn test_reload_on_change() {
        let dir = tempdir().unwrap();
        let mut store = FlatFile::<Lightning>::open("live", Some(dir.path())).unwrap();
        store.set("a", 1).unwrap();
        assert!(!store.has_changed());

        touch_with(store.path(), "a = 2");

        assert!(store.has_changed());
        assert_eq!(store.get("a").unwrap(), Some(Value::from("2")));
        assert!(!store.has_changed());
    }

    #[test]
    fn test_reload_never_keeps_cache() {
        let dir = tempdir().unwrap();
        let settings = StoreSettings::default().with_reload(ReloadPolicy::Never);
        let mut store = FlatFile::<Lightning>::open_with("cached", Some(dir.path()), settings).unwrap();
        store.set("a", 1).unwrap();

        touch_with(store.path(), "a = 2");
        assert_eq!(store.get("a").unwrap(), Some(Value::from("1")));

        store.force_reload().unwrap();
        assert_eq!(store.get("a").unwrap(), Some(Value::from("2")));
    }

    #[test]
    fn test_reload_always_rereads() {
        let dir = tempdir().unwrap();
        let settings = StoreSettings::default().with_reload(ReloadPolicy::Always);
        let mut store = FlatFile::<Lightning>::open_with("eager", Some(dir.path()), settings).unwrap();
        store.set("a", 1).unwrap();

        // Same mtime, different content: only an unconditional reload notices.
        let mtime = file::modified(store.path()).unwrap();
        fs::write(store.path(), "a = 3").unwrap();
        fs::File::options()
            .write(true)
            .open(store.path())
            .unwrap()
            .set_modified(mtime)
            .unwrap();

        assert_eq!(store.get("a").unwrap(), Some(Value::from("3")));
    }

    #[test]
    fn test_malformed_file_surfaces_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.ls");
        fs::write(&path, "a {\nb = 1").unwrap();

        let err = FlatFile::<Lightning>::from_path(&path, StoreSettings::default()).unwrap_err();
        assert!(matches!(err, StoreError::UnterminatedBlock { line: 1 }));
    }

    #[test]
    fn test_from_path_checks_extension() {
        let dir = tempdir().unwrap();
        let err =
            FlatFile::<Lightning>::from_path(dir.path().join("x.yml"), StoreSettings::default())
                .unwrap_err();
        assert!(matches!(err, StoreError::InvalidExtension { format: "lightning", .. }));

        assert!(
            FlatFile::<Yaml>::from_path(dir.path().join("x.yaml"), StoreSettings::default())
                .is_ok()
        );
    }

    #[test]
    fn test_with_defaults_seeds_new_file_only() {
        let dir = tempdir().unwrap();
        let seed = "# defaults\nlevel = info";

        let mut store =
            FlatFile::<Lightning>::with_defaults("seeded", Some(dir.path()), seed, StoreSettings::default())
                .unwrap();
        assert_eq!(store.get("level").unwrap(), Some(Value::from("info")));
        store.set("level", "debug").unwrap();

        let mut again =
            FlatFile::<Lightning>::with_defaults("seeded", Some(dir.path()), seed, StoreSettings::default())
                .unwrap();
        assert_eq!(again.get("level").unwrap(), Some(Value::from("debug")));
        assert_eq!(again.header().unwrap(), vec!["# defaults"]);
    }

    #[test]
    fn test_get_or_set() {
        let dir = tempdir().unwrap();
        let mut store = FlatFile::<Lightning>::open("gs", Some(dir.path())).unwrap();

        assert_eq!(store.get_or_set("a.b", "first").unwrap(), Value::from("first"));
        assert_eq!(store.get_or_set("a.b", "second").unwrap(), Value::from("first"));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "a {\n  b = first\n}");
    }

    #[test]
    fn test_bulk_operations() {
        let dir = tempdir().unwrap();
        let mut store = FlatFile::<Lightning>::open("bulk", Some(dir.path())).unwrap();

        store
            .put_all([("a", Value::from(1)), ("b.c", Value::from("x")), ("d", Value::from(vec!["y"]))])
            .unwrap();
        assert_eq!(store.key_set().unwrap(), vec!["a", "b.c", "d"]);
        assert_eq!(store.single_layer_key_set().unwrap(), vec!["a", "b", "d"]);
        assert_eq!(store.key_set_under("b").unwrap(), vec!["c"]);
        assert_eq!(store.single_layer_key_set_under("b").unwrap(), vec!["c"]);

        let values = store.get_all(&["a", "zzz"]).unwrap();
        assert_eq!(values, vec![Some(Value::from("1")), None]);

        assert_eq!(store.remove_all(&["a", "zzz", "d"]).unwrap(), 2);
        assert_eq!(store.key_set().unwrap(), vec!["b.c"]);

        assert_eq!(store.remove("b.c").unwrap(), Some(Value::from("x")));
        assert_eq!(store.remove("b.c").unwrap(), None);

        store.clear().unwrap();
        assert!(store.data().unwrap().is_empty());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "");
    }

    #[test]
    fn test_add_defaults_from_yaml_store() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("defaults.yml"), "level: info\nserver:\n  port: 80\n").unwrap();
        fs::write(dir.path().join("app.ls"), "level = debug").unwrap();

        let mut defaults = FlatFile::<Yaml>::open("defaults", Some(dir.path())).unwrap();
        let mut store = FlatFile::<Lightning>::open("app", Some(dir.path())).unwrap();

        assert_eq!(store.add_defaults_from(&mut defaults).unwrap(), 1);
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "level = debug\nserver {\n  port = 80\n}"
        );
    }

    #[test]
    fn test_replace_raw_text() {
        let dir = tempdir().unwrap();
        let mut store = FlatFile::<Lightning>::open("raw", Some(dir.path())).unwrap();
        store.set("greeting", "hello world").unwrap();

        store.replace("world", "there").unwrap();
        assert_eq!(store.get("greeting").unwrap(), Some(Value::from("hello there")));
    }

    #[test]
    fn test_unwritable_value_leaves_store_intact() {
        let dir = tempdir().unwrap();
        let mut store = FlatFile::<Lightning>::open("guarded", Some(dir.path())).unwrap();
        store.set("a", "ok").unwrap();

        let err = store.set("a", "x\ny").unwrap_err();
        assert!(matches!(err, StoreError::Unwritable { ref key, .. } if key == "a"));
        assert!(store.put_all([("b", "fine"), ("c", "x}")]).is_err());

        assert_eq!(fs::read_to_string(store.path()).unwrap(), "a = ok");
        store.force_reload().unwrap();
        assert_eq!(store.get("a").unwrap(), Some(Value::from("ok")));
        assert!(!store.contains("b").unwrap());
    }

    #[test]
    fn test_yaml_store_accepts_multiline_text() {
        let dir = tempdir().unwrap();
        let mut store = FlatFile::<Yaml>::open("free", Some(dir.path())).unwrap();
        store.set("motd", "line one\nline two").unwrap();

        store.force_reload().unwrap();
        assert_eq!(store.get("motd").unwrap(), Some(Value::from("line one\nline two")));
    }

    #[test]
    fn test_framed_header_written() {
        let dir = tempdir().unwrap();
        let mut store = FlatFile::<Yaml>::open("framed", Some(dir.path())).unwrap();
        store.set("a", "b").unwrap();
        store.framed_header(&["Demo"]).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("# +---"));
        assert!(lines[1].contains("Demo"));
        assert!(lines[2].starts_with("# +---"));
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "a: b");

        let mut reopened = FlatFile::<Yaml>::open("framed", Some(dir.path())).unwrap();
        assert_eq!(reopened.header().unwrap().len(), 3);
    }
}
