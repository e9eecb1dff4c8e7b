//! fapp - application bundle launcher
//!
//! Validates a `.fapp` bundle directory, reads its manifest, builds the
//! environment for the bundled executable and replaces the current process
//! with it.

use clap::Parser;

mod bundle;
mod cli;
mod commands;
mod config;
mod environment;
mod error;
mod launcher;
mod logging;
mod manifest;

use cli::Cli;
use config::{BundleLayout, LaunchOptions};
use error::{FappError, Result};
use launcher::{DryRunReplacer, ExecReplacer, LaunchRequest, ProcessReplacer};
use miette::Diagnostic;

fn run(cli: Cli, options: LaunchOptions) -> Result<()> {
    if let Some(shell) = cli.completions.as_deref() {
        return commands::completions::run(shell);
    }

    let (bundle, args) = cli.into_bundle_and_args().ok_or_else(|| {
        error::launch::usage(format!("No bundle path given\n\n{}", cli::usage()))
    })?;

    let request = LaunchRequest {
        bundle,
        args,
        inherited: std::env::vars_os().collect(),
    };

    let replacer: &dyn ProcessReplacer = if options.dry_run {
        &DryRunReplacer
    } else {
        &ExecReplacer
    };

    launcher::launch(&BundleLayout::default(), request, replacer)
}

fn report(err: &FappError) {
    if let FappError::Usage { message } = err {
        println!("{message}");
        return;
    }
    eprintln!("Error: {err}");
    if let Some(help) = err.help() {
        eprintln!("Help: {help}");
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let options = LaunchOptions {
        dry_run: cli.dry_run,
        strict: cli.strict,
    };

    if let Err(e) = run(cli, options) {
        report(&e);
        std::process::exit(e.exit_code(options.strict));
    }
}
