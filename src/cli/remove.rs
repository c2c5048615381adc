//! Remove command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::store::{FlatFile, Format};

use super::{with_store, GlobalArgs, StoreCommand};

/// Remove one or more keys
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Configuration file (.ls, .yml, .yaml)
    pub file: PathBuf,

    /// Dotted keys to remove
    #[arg(required = true)]
    pub keys: Vec<String>,
}

impl StoreCommand for RemoveArgs {
    fn run<F: Format>(self, store: &mut FlatFile<F>, printer: &Printer) -> Result<()> {
        let mut missing = Vec::new();
        for key in &self.keys {
            if !store.contains(key)? {
                missing.push(key.as_str());
            }
        }
        for key in &missing {
            printer.warning("Missing", &format!("{} has no key '{}'", store.name(), key));
        }

        let keys: Vec<&str> = self.keys.iter().map(String::as_str).collect();
        let removed = store.remove_all(&keys)?;
        printer.status(
            "Removed",
            &format!("{} from {}", plural(removed, "key", "keys"), display_path(store.path())),
        );
        Ok(())
    }
}

pub fn run(args: RemoveArgs, global: &GlobalArgs, printer: &Printer) -> Result<()> {
    let settings = global.store_settings()?;
    let file = args.file.clone();
    with_store(&file, settings, true, args, printer)
}
