//! Shell completions command

use std::io::Write;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::error::{Result, launch};

/// Parse a shell name, case-insensitively
pub fn parse_shell(name: &str) -> Result<Shell> {
    match name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "elvish" => Ok(Shell::Elvish),
        "fish" => Ok(Shell::Fish),
        "powershell" | "pwsh" => Ok(Shell::PowerShell),
        "zsh" => Ok(Shell::Zsh),
        _ => Err(launch::usage(format!(
            "Unknown shell: {name}. Supported shells: bash, elvish, fish, powershell, zsh"
        ))),
    }
}

/// Write the completion script for `shell` to `out`
pub fn generate(shell: Shell, out: &mut dyn Write) {
    let mut cmd = <crate::cli::Cli as CommandFactory>::command();
    clap_complete::generate(shell, &mut cmd, "fapp", out);
}

/// Generate shell completions on stdout
pub fn run(shell_name: &str) -> Result<()> {
    let shell = parse_shell(shell_name)?;
    generate(shell, &mut std::io::stdout().lock());
    Ok(())
}
