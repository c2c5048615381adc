//! Get command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::codec::{self, CommentMode};
use crate::error::{Result, StoreError};
use crate::output::Printer;
use crate::store::{FlatFile, Format, Value};

use super::{with_store, GlobalArgs, StoreCommand};

/// Print the value stored at a dotted key
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration file (.ls, .yml, .yaml)
    pub file: PathBuf,

    /// Dotted key, e.g. server.port
    pub key: String,

    /// Print the value as JSON
    #[arg(long)]
    pub json: bool,
}

impl StoreCommand for GetArgs {
    fn run<F: Format>(self, store: &mut FlatFile<F>, _printer: &Printer) -> Result<()> {
        let value = store.get(&self.key)?.ok_or_else(|| StoreError::Command {
            message: format!("Key '{}' not found in {}", self.key, store.name()),
            help: Some("List available keys with `flatstore keys`".to_string()),
        })?;

        println!("{}", render_value(&value, self.json)?);
        Ok(())
    }
}

/// Text printed for a value: JSON, or one list item per line, or a section
/// in the brace format.
pub fn render_value(value: &Value, json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(value).map_err(|e| StoreError::Command {
            message: format!("Failed to encode JSON: {}", e),
            help: None,
        });
    }
    Ok(match value {
        Value::Text(text) => text.clone(),
        Value::List(items) => items.join("\n"),
        Value::Section(doc) => codec::write(doc, CommentMode::WithComments),
    })
}

pub fn run(args: GetArgs, global: &GlobalArgs, printer: &Printer) -> Result<()> {
    let settings = global.store_settings()?;
    let file = args.file.clone();
    with_store(&file, settings, true, args, printer)
}
