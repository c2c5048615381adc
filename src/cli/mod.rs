pub mod check;
pub mod completions;
pub mod fmt;
pub mod get;
pub mod keys;
pub mod remove;
pub mod set;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::codec::CommentMode;
use crate::error::{Result, StoreError};
use crate::output::Printer;
use crate::settings::{ReloadPolicy, StoreSettings};
use crate::store::{FlatFile, Format, FormatKind, Lightning, Yaml};

/// flatstore - Read and edit comment-preserving configuration files
#[derive(Parser, Debug)]
#[command(name = "flatstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the value stored at a dotted key
    Get(get::GetArgs),

    /// Store a value at a dotted key
    Set(set::SetArgs),

    /// Remove one or more keys
    Remove(remove::RemoveArgs),

    /// List the keys of a file
    Keys(keys::KeysArgs),

    /// Rewrite a file in canonical layout
    Fmt(fmt::FmtArgs),

    /// Parse every configuration file below a directory
    Check(check::CheckArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Settings file (default: ./flatstore.yaml when present)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Drop comments and blank lines when writing
    #[arg(long, global = true)]
    pub strip_comments: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl GlobalArgs {
    /// Resolve settings from the settings file and command-line overrides.
    pub fn store_settings(&self) -> Result<StoreSettings> {
        let settings = match &self.settings {
            Some(path) => StoreSettings::load(path)?,
            None => StoreSettings::discover(Path::new("."))?,
        };
        // Every read goes to disk.
        let settings = settings.with_reload(ReloadPolicy::Always);
        Ok(if self.strip_comments {
            settings.with_comments(CommentMode::WithoutComments)
        } else {
            settings
        })
    }
}

/// A subcommand that works on one opened store of any format.
pub trait StoreCommand {
    fn run<F: Format>(self, store: &mut FlatFile<F>, printer: &Printer) -> Result<()>;
}

/// Open the store at `path` in the format its extension names and run `command`.
pub fn with_store<C: StoreCommand>(
    path: &Path,
    settings: StoreSettings,
    must_exist: bool,
    command: C,
    printer: &Printer,
) -> Result<()> {
    if must_exist && !path.exists() {
        return Err(StoreError::Command {
            message: format!("{} does not exist", path.display()),
            help: Some("Create it with `flatstore set`".to_string()),
        });
    }

    match detect_format(path)? {
        FormatKind::Lightning => {
            command.run(&mut FlatFile::<Lightning>::from_path(path, settings)?, printer)
        }
        FormatKind::Yaml => command.run(&mut FlatFile::<Yaml>::from_path(path, settings)?, printer),
    }
}

pub(crate) fn detect_format(path: &Path) -> Result<FormatKind> {
    FormatKind::detect(path).ok_or_else(|| StoreError::Command {
        message: format!("Unknown file type: {}", path.display()),
        help: Some(format!(
            "Use a .{} or .{} file",
            Lightning::EXTENSION,
            Yaml::EXTENSION
        )),
    })
}
