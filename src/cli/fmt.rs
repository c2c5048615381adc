//! Fmt command implementation.
//!
//! Rewrites a file the way a store would write it, keeping or dropping
//! comments according to `--strip-comments`.

use std::path::PathBuf;

use clap::Args;

use crate::codec::CommentMode;
use crate::error::{Result, StoreError};
use crate::output::{display_path, Printer};
use crate::store::{file, Format, FormatKind, Lightning, Yaml};

use super::{detect_format, GlobalArgs};

/// Rewrite a file in canonical layout
#[derive(Args, Debug)]
pub struct FmtArgs {
    /// Configuration file (.ls, .yml, .yaml)
    pub file: PathBuf,

    /// Fail instead of writing when the file is not canonical
    #[arg(long)]
    pub check: bool,
}

/// Parse and re-render text in format `F`.
pub fn reformat<F: Format>(text: &str, mode: CommentMode) -> Result<String> {
    F::render(&F::parse(text)?, mode)
}

pub fn run(args: FmtArgs, global: &GlobalArgs, printer: &Printer) -> Result<()> {
    let settings = global.store_settings()?;
    let kind = detect_format(&args.file)?;
    let text = file::read(&args.file)?;

    let formatted = match kind {
        FormatKind::Lightning => reformat::<Lightning>(&text, settings.comments)?,
        FormatKind::Yaml => reformat::<Yaml>(&text, settings.comments)?,
    };

    let shown = display_path(&args.file);
    if formatted == text {
        printer.info("Unchanged", &shown);
        return Ok(());
    }

    if args.check {
        return Err(StoreError::Command {
            message: format!("{} is not formatted", shown),
            help: Some("Run `flatstore fmt` without --check to rewrite it".to_string()),
        });
    }

    file::write(&args.file, &formatted)?;
    printer.status("Formatted", &shown);
    Ok(())
}
