// src/main.rs — rageval entry point

use clap::Parser;
use std::path::Path;

use rageval::cli::format::FormatArgs;
use rageval::cli::{exit_code, Cli, Commands};
use rageval::infra::config::Config;
use rageval::infra::logger;

fn main() {
    // Initialize logging (respects RAGEVAL_LOG / RUST_LOG)
    logger::init_logging("warn");

    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(exit_code(&e));
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let config = if let Some(ref path) = cli.config {
        Config::load_from(Path::new(path))?
    } else {
        Config::load()?
    };

    match cli.command {
        Commands::Score { file, k, format } => {
            rageval::cli::score::run_score(&file, &k, &format, &config)
        }
        Commands::Extract { file, template } => {
            rageval::cli::extract::run_extract(file.as_deref(), template.as_deref(), &config)
        }
        Commands::Format {
            question,
            facts,
            answer,
            citations,
            template,
            log,
        } => {
            let args = FormatArgs {
                question: &question,
                facts: facts.as_deref(),
                answer: answer.as_deref(),
                citations,
                template: template.as_deref(),
                log: log.as_deref(),
            };
            rageval::cli::format::run_format(args, &config)
        }
        Commands::Dialogue { action } => rageval::cli::dialogue::run_dialogue(action),
    }
}
