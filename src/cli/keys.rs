//! Keys command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::error::Result;
use crate::output::Printer;
use crate::store::{FlatFile, Format};

use super::{with_store, GlobalArgs, StoreCommand};

/// List the keys of a file
#[derive(Args, Debug)]
pub struct KeysArgs {
    /// Configuration file (.ls, .yml, .yaml)
    pub file: PathBuf,

    /// Only list keys below this block, relative to it
    #[arg(long)]
    pub under: Option<String>,

    /// List only one level instead of every leaf key
    #[arg(long)]
    pub shallow: bool,
}

impl KeysArgs {
    fn collect<F: Format>(&self, store: &mut FlatFile<F>) -> Result<Vec<String>> {
        match (&self.under, self.shallow) {
            (Some(under), true) => store.single_layer_key_set_under(under),
            (Some(under), false) => store.key_set_under(under),
            (None, true) => store.single_layer_key_set(),
            (None, false) => store.key_set(),
        }
    }
}

impl StoreCommand for KeysArgs {
    fn run<F: Format>(self, store: &mut FlatFile<F>, _printer: &Printer) -> Result<()> {
        for key in self.collect(store)? {
            println!("{key}");
        }
        Ok(())
    }
}

pub fn run(args: KeysArgs, global: &GlobalArgs, printer: &Printer) -> Result<()> {
    let settings = global.store_settings()?;
    let file = args.file.clone();
    with_store(&file, settings, true, args, printer)
}
