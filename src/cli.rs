use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "reel", version)]
#[command(about = "Sort a dated footage folder into media library bins", long_about = None)]
pub struct Cli {
    /// Root footage folder, one subfolder per bin
    pub folder: PathBuf,

    /// Configuration file, merged over the one in the user config directory
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Library document to reconcile against, overriding the configuration
    #[arg(long, value_name = "FILE")]
    pub library: Option<PathBuf>,

    /// Report what would happen without changing the library
    #[arg(long)]
    pub dry_run: bool,

    /// Skip importing root-level load videos into L<n> bins
    #[arg(long)]
    pub no_loads: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
