// ABOUTME: Shell completion generation using clap_complete for all supported shells
// ABOUTME: Provides static completions for bash, zsh, fish, and powershell

use clap::{Command, ValueEnum};
use clap_complete::{generate, shells};
use std::fmt;
use std::io::Write;

const BIN_NAME: &str = "blockgen";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[allow(clippy::enum_variant_names)]
    #[value(alias = "pwsh")]
    PowerShell,
}

impl Shell {
    pub fn all() -> [Shell; 4] {
        [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell]
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shell_str = match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Fish => "fish",
            Shell::PowerShell => "powershell",
        };
        write!(f, "{}", shell_str)
    }
}

/// Write the completion script for `shell` to `writer`
pub fn write_completions<W: Write>(shell: Shell, cmd: &mut Command, writer: &mut W) {
    match shell {
        Shell::Bash => generate(shells::Bash, cmd, BIN_NAME, writer),
        Shell::Zsh => generate(shells::Zsh, cmd, BIN_NAME, writer),
        Shell::Fish => generate(shells::Fish, cmd, BIN_NAME, writer),
        Shell::PowerShell => generate(shells::PowerShell, cmd, BIN_NAME, writer),
    }
}
