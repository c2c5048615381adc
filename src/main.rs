use clap::Parser;
use flatstore::cli::{Cli, Commands};
use flatstore::output::Printer;
use miette::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.global.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let printer = Printer::new();
    let global = &cli.global;

    match cli.command {
        Commands::Get(args) => flatstore::cli::get::run(args, global, &printer)?,
        Commands::Set(args) => flatstore::cli::set::run(args, global, &printer)?,
        Commands::Remove(args) => flatstore::cli::remove::run(args, global, &printer)?,
        Commands::Keys(args) => flatstore::cli::keys::run(args, global, &printer)?,
        Commands::Fmt(args) => flatstore::cli::fmt::run(args, global, &printer)?,
        Commands::Check(args) => flatstore::cli::check::run(args, &printer)?,
        Commands::Completions(args) => flatstore::cli::completions::run(args)?,
    }

    Ok(())
}
