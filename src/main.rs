mod cli;
mod logging;

use crate::cli::Cli;
use clap::Parser;
use reel_config::Config;
use reel_library::LibraryHandle;
use reel_library::backend::{FileLibrary, ReadOnlyLibrary};
use reel_reconcile::{Context, VideoExtensions};
use std::fmt::{Debug, Display};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let args = Cli::parse();
    logging::init(args.verbose);

    let mut config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => return fail(err),
    };
    if let Some(library) = &args.library {
        config.library = library.clone();
    }
    tracing::debug!(?config, "Loaded configuration");

    let library: LibraryHandle = match FileLibrary::open(&config.library_name, &config.library) {
        Ok(library) => Arc::new(library),
        Err(err) => return fail(err),
    };
    let library: LibraryHandle = if args.dry_run {
        Arc::new(ReadOnlyLibrary::new(library))
    } else {
        library
    };

    let ctx = Context {
        extensions: VideoExtensions::new(&config.extensions),
        assign_loads: config.assign_loads && !args.no_loads,
    };
    let mut print = |event: reel_reconcile::Event| println!("{event}");
    match reel_reconcile::reconcile(library.as_ref(), &args.folder, &ctx, &mut print) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => fail(err),
    }
}

fn fail(err: impl Display + Debug) -> ExitCode {
    tracing::debug!(error = ?err, "Run failed");
    eprintln!("error: {err}");
    ExitCode::FAILURE
}
