// ABOUTME: Main entry point for the blockgen CLI application
// ABOUTME: Loads the project file and dispatches sync, generate, query, blocks and completions

use anyhow::Result;
use blockgen_cli::cli::{Cli, Commands};
use blockgen_cli::cli_output::CliOutput;
use blockgen_cli::commands;
use blockgen_cli::completions::write_completions;
use blockgen_cli::config::Config;
use blockgen_cli::output::{JsonFormatter, OutputFormat, TableFormatter};
use blockgen_sdk::CmsError;
use clap::{CommandFactory, Parser};
use std::env;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    // Determine if color should be used
    let use_color = !cli.no_color
        && env::var("NO_COLOR").is_err()
        && env::var("TERM").unwrap_or_default() != "dumb"
        && CliOutput::new().use_color();
    let output = CliOutput::with_color(use_color);

    if let Err(e) = run(cli, &output, use_color).await {
        output.error(&format!("{:#}", e));
        if let Some(help) = e.downcast_ref::<CmsError>().and_then(CmsError::help_text) {
            output.hint(help);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &CliOutput, use_color: bool) -> Result<()> {
    let config_path = cli.config;

    match cli.command {
        Commands::Completions { shell } => {
            write_completions(shell, &mut Cli::command(), &mut std::io::stdout());
        }
        Commands::Sync {
            json,
            pretty,
            output: output_file,
        } => {
            let config = Config::load(config_path.as_deref())?;
            let spinner = output.spinner("Fetching content from the CMS...");
            let result = commands::sync(&config).await;
            spinner.finish_and_clear();
            let context = result?;

            for warning in &context.warnings {
                output.warning(&warning.to_string());
            }
            if let Some(notice) = context.redeploy_notice() {
                output.warning(&notice);
            }

            if json {
                let rendered = JsonFormatter::new(pretty).format_context(&context)?;
                match output_file {
                    Some(path) => {
                        commands::write_output(&path, &rendered)?;
                        output.success(&format!("Wrote snapshot to {}", path.display()));
                    }
                    None => println!("{}", rendered),
                }
            } else {
                if context.snapshot.collections.is_empty() {
                    println!("No content collections found.");
                } else {
                    println!(
                        "{}",
                        TableFormatter::new(use_color).format_context(&context)?
                    );
                }
                output.success(&format!(
                    "Fetched {} blocks from {} collections",
                    context.snapshot.block_count(),
                    context.snapshot.collections.len()
                ));
            }
        }
        Commands::Generate => {
            let config = Config::load(config_path.as_deref())?;
            let report = commands::generate(&config)?;
            output.success(&format!(
                "Wrote {} files to {}",
                report.files.len(),
                config.theme_dir().display()
            ));
            output.info("Upload the theme to the CMS so it knows the new block types.");
        }
        Commands::Query { degraded } => {
            let config = Config::load(config_path.as_deref())?;
            println!("{}", commands::query_text(&config, degraded)?);
        }
        Commands::Blocks { json, pretty } => {
            let registry = Config::load(config_path.as_deref())?.registry()?;
            if registry.is_empty() && !json {
                println!("No blocks configured.");
            } else if json {
                println!("{}", JsonFormatter::new(pretty).format_blocks(&registry)?);
            } else {
                println!("{}", TableFormatter::new(use_color).format_blocks(&registry)?);
            }
        }
    }

    Ok(())
}
