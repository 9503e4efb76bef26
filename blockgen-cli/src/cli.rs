// ABOUTME: CLI argument definitions for the blockgen command-line tool
// ABOUTME: Defines the command-line interface structure using clap derive macros

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "blockgen")]
#[command(
    about = "Sync WordPress block content over WPGraphQL and generate ACF block templates",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Path to the project file (default: ./blockgen.toml)
    #[arg(long, short, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose output for debugging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch block content, regenerating templates when the CMS schema is behind
    Sync {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Pretty print JSON output
        #[arg(long, requires = "json")]
        pretty: bool,

        /// Write the JSON snapshot to a file instead of stdout
        #[arg(long, short, value_name = "FILE", requires = "json")]
        output: Option<PathBuf>,
    },
    /// Compile all blocks and write templates and functions.php
    Generate,
    /// Print the GraphQL query sent to the CMS
    Query {
        /// Print the query without block fragments
        #[arg(long)]
        degraded: bool,
    },
    /// List configured blocks
    Blocks {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Pretty print JSON output
        #[arg(long, requires = "json")]
        pretty: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: crate::completions::Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "blockgen");

        for name in ["sync", "generate", "query", "blocks", "completions"] {
            assert!(cli.find_subcommand(name).is_some(), "missing {name}");
        }
        cli.debug_assert();
    }

    #[test]
    fn test_parse_sync_command() {
        let cli = Cli::try_parse_from(["blockgen", "sync"]).unwrap();
        match cli.command {
            Commands::Sync {
                json,
                pretty,
                output,
            } => {
                assert!(!json);
                assert!(!pretty);
                assert!(output.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }

        let cli = Cli::try_parse_from([
            "blockgen", "sync", "--json", "--pretty", "-o", "cms.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Sync {
                json,
                pretty,
                output,
            } => {
                assert!(json);
                assert!(pretty);
                assert_eq!(output, Some(PathBuf::from("cms.json")));
            }
            other => panic!("unexpected command {other:?}"),
        }

        // --pretty requires --json
        assert!(Cli::try_parse_from(["blockgen", "sync", "--pretty"]).is_err());
        assert!(Cli::try_parse_from(["blockgen", "sync", "--output", "x.json"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "blockgen",
            "query",
            "--degraded",
            "--config",
            "site/blockgen.toml",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("site/blockgen.toml")));
        assert!(matches!(cli.command, Commands::Query { degraded: true }));
    }

    #[test]
    fn test_completions_shell_value() {
        let cli = Cli::try_parse_from(["blockgen", "completions", "zsh"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Completions {
                shell: crate::completions::Shell::Zsh
            }
        ));
        assert!(Cli::try_parse_from(["blockgen", "completions", "tcsh"]).is_err());
    }
}
