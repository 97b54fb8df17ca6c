// src/cli/mod.rs — CLI definition (clap derive)

pub mod dialogue;
pub mod extract;
pub mod format;
pub mod score;

use clap::{Parser, Subcommand};

use crate::infra::errors::RagEvalError;

/// Process exit status for a failed command: 2 for a bad template name or
/// config file, 1 for anything else.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<RagEvalError>() {
        Some(e) if e.is_config() => 2,
        _ => 1,
    }
}

#[derive(Parser)]
#[command(
    name = "rageval",
    about = "Retrieval metrics and prompt/response formatting for RAG evaluation",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score retrieval runs from a JSONL file of {gold, retrieved} records
    Score {
        /// JSONL input, one query per line
        file: String,
        /// Cutoffs to report (defaults to [metrics].cutoffs)
        #[arg(short, long, value_delimiter = ',')]
        k: Vec<usize>,
        /// Output format (json, yaml)
        #[arg(long, default_value = "json")]
        format: String,
    },
    /// Extract {answer, citations} from raw model output
    Extract {
        /// Input file (reads stdin when omitted)
        file: Option<String>,
        /// Template name (defaults to [template].name)
        #[arg(short, long)]
        template: Option<String>,
    },
    /// Build training and metadata turns for a question and optional answer
    Format {
        #[arg(short, long)]
        question: String,
        /// JSON array of {id, title} facts
        #[arg(long)]
        facts: Option<String>,
        #[arg(short, long)]
        answer: Option<String>,
        /// Cited fact ids, comma separated
        #[arg(long, value_delimiter = ',')]
        citations: Option<Vec<String>>,
        /// Template name (defaults to [template].name)
        #[arg(short, long)]
        template: Option<String>,
        /// Append metadata turns to this conversation log
        #[arg(long)]
        log: Option<String>,
    },
    /// Manage a conversation log file
    Dialogue {
        #[command(subcommand)]
        action: DialogueAction,
    },
}

#[derive(Subcommand, Clone)]
pub enum DialogueAction {
    /// Print the log's turns
    Show {
        #[arg(long)]
        log: String,
    },
    /// Reset the log to its single system turn
    Reset {
        #[arg(long)]
        log: String,
        /// Replace the system prompt while resetting
        #[arg(long)]
        system: Option<String>,
    },
}
