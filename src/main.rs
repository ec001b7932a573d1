//! pr-triage CLI

mod cli;

use anstream::eprintln;
use clap::{ArgAction, Parser, Subcommand};
use cli::style::Stylize;
use cli::{Overrides, run_auth, run_triage};
use pr_triage::config::AiProvider;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pr-triage",
    version,
    about = "Merge, fix or flag bot-authored pull requests",
    long_about = "Triages every open pull request of an owner: merges green PRs from \
                  trusted authors, resolves merge conflicts with an AI assistant, and \
                  asks authors to fix failing pipelines.\n\n\
                  Examples:\n  pr-triage run\n  pr-triage run octo/hello#42\n  \
                  pr-triage run --owner octo --provider ollama"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (default: ~/.config/pr-triage/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Triage open PRs, or a single PR
    Run {
        /// Single PR to process (owner/repo#123 or a pull request URL)
        pr: Option<String>,

        /// GitHub user or organization whose PRs are searched
        #[arg(long)]
        owner: Option<String>,

        /// AI provider (gemini or ollama)
        #[arg(long)]
        provider: Option<AiProvider>,

        /// AI model name
        #[arg(long)]
        model: Option<String>,

        /// Number of PRs processed at once
        #[arg(long)]
        concurrency: Option<usize>,

        /// Directory for the JSON run report
        #[arg(long)]
        output: Option<PathBuf>,

        /// Never attempt automatic conflict resolution
        #[arg(long)]
        no_resolve: bool,
    },
    /// Show which GitHub credentials are used
    Auth,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "pr_triage=info",
        1 => "pr_triage=debug",
        _ => "pr_triage=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Command::Run {
            pr,
            owner,
            provider,
            model,
            concurrency,
            output,
            no_resolve,
        } => {
            let overrides = Overrides {
                owner,
                provider,
                model,
                concurrency,
                output_dir: output,
                no_resolve,
            };
            tokio::select! {
                result = run_triage(config, pr.as_deref(), overrides) => result.map(|_| ()),
                _ = tokio::signal::ctrl_c() => {
                    eprintln!("{}", "Interrupted, in-flight work was abandoned".warn());
                    return ExitCode::from(130);
                }
            }
        }
        Command::Auth => run_auth(config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "Error:".error());
            ExitCode::FAILURE
        }
    }
}
