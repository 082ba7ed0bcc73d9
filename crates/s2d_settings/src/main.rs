//! Sports2D settings CLI entry point.

use std::{io, process};

use clap::Parser;
use tracing::{debug, error};

use s2d_core::logging::{init_tracing, init_tracing_with_file};
use s2d_settings::{exit_code, Args};

fn main() {
    let args = Args::parse();

    // The guard flushes the file writer when main returns
    let _guard = match &args.log_dir {
        Some(dir) => match init_tracing_with_file(args.log_level, dir) {
            Ok(guard) => Some(guard),
            Err(err) => {
                eprintln!("Could not open log directory {}: {err}", dir.display());
                init_tracing(args.log_level);
                None
            }
        },
        None => {
            init_tracing(args.log_level);
            None
        }
    };

    debug!(?args, "Parsed arguments");

    let stdout = io::stdout();
    if let Err(err) = s2d_settings::run(&args, &mut stdout.lock()) {
        error!("{err:#}");
        let code = exit_code(&err);
        drop(_guard);
        process::exit(code);
    }
}
