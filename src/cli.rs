//! CLI definitions using clap derive API

use clap::builder::{FalseyValueParser, Styles, styling::AnsiColor};
use clap::{ArgAction, CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// fapp - application bundle launcher
///
/// Runs the executable declared by a .fapp bundle's manifest with the bundle's
/// environment applied.
#[derive(Parser, Debug)]
#[command(
    name = "fapp",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Launch .fapp application bundles",
    long_about = "Launch .fapp application bundles.\n\n\
                  Reads <BUNDLE>/main.json, prepends <BUNDLE>/lib to LD_LIBRARY_PATH, applies the \
                  manifest's env_vars ({ROOT_DIR} is replaced with the bundle path) and replaces \
                  this process with <BUNDLE>/bin/<exe>. Options must come before the bundle path; \
                  everything after it is passed to the application.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  fapp /apps/demo.fapp               \x1b[90m# Launch a bundle\x1b[0m\n   \
                  fapp /apps/demo.fapp --flag val    \x1b[90m# Forward arguments\x1b[0m\n   \
                  fapp --dry-run /apps/demo.fapp     \x1b[90m# Show what would run\x1b[0m\n   \
                  fapp --completions bash            \x1b[90m# Print bash completions\x1b[0m\n"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print the executable, arguments and environment instead of launching
    #[arg(long, env = "FAPP_DRY_RUN", value_parser = FalseyValueParser::new())]
    pub dry_run: bool,

    /// Exit with a non-zero status on every failure
    #[arg(long, env = "FAPP_STRICT", value_parser = FalseyValueParser::new())]
    pub strict: bool,

    /// Print shell completions (bash, elvish, fish, powershell, zsh) and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<String>,

    /// Path to the .fapp bundle directory, then arguments for its executable
    ///
    /// Option parsing stops at the bundle path, so everything after it is
    /// forwarded verbatim, including --help and fapp's own flags.
    #[arg(
        value_name = "BUNDLE",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<OsString>,
}

impl Cli {
    /// Split the positional command into the bundle path and forwarded arguments.
    pub fn into_bundle_and_args(self) -> Option<(PathBuf, Vec<OsString>)> {
        let mut command = self.command.into_iter();
        let bundle = PathBuf::from(command.next()?);
        Some((bundle, command.collect()))
    }
}

/// Rendered usage line, for errors raised after parsing
pub fn usage() -> String {
    Cli::command().render_usage().to_string()
}
