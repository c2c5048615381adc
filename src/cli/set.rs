//! Set command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::error::Result;
use crate::output::{display_path, Printer};
use crate::store::{FlatFile, Format, Value};

use super::{with_store, GlobalArgs, StoreCommand};

/// Store a value at a dotted key
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Configuration file (.ls, .yml, .yaml); created if missing
    pub file: PathBuf,

    /// Dotted key, e.g. server.port
    pub key: String,

    /// Value to store; several values form a list
    #[arg(required = true, num_args = 1..)]
    pub values: Vec<String>,

    /// Store a list even for a single value
    #[arg(long)]
    pub list: bool,
}

impl SetArgs {
    fn value(&self) -> Value {
        if self.list || self.values.len() > 1 {
            Value::List(self.values.clone())
        } else {
            Value::Text(self.values.concat())
        }
    }
}

impl StoreCommand for SetArgs {
    fn run<F: Format>(self, store: &mut FlatFile<F>, printer: &Printer) -> Result<()> {
        let existed = store.contains(&self.key)?;
        store.set(&self.key, self.value())?;

        let verb = if existed { "Updated" } else { "Added" };
        printer.status(verb, &format!("{} ({})", display_path(store.path()), self.key));
        Ok(())
    }
}

pub fn run(args: SetArgs, global: &GlobalArgs, printer: &Printer) -> Result<()> {
    let settings = global.store_settings()?;
    let file = args.file.clone();
    with_store(&file, settings, false, args, printer)
}
