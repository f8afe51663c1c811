use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use planner_core::Category;

/// Command line client for the day-planner backend.
#[derive(Debug, Parser)]
#[command(name = "planner", version, about = "Index documents and generate daily plans")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Backend base URL (overrides config and PLANNER_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Path to a RON config file (defaults to ./planner.ron when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the number of indexed documents.
    Status,
    /// Index a document. Reads stdin when neither TEXT nor --file is given.
    Ingest {
        /// Document category: email, transcription or note.
        #[arg(short = 't', long, default_value_t = Category::Email)]
        category: Category,
        /// Read the document from a file.
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Document text.
        text: Option<String>,
    },
    /// Generate a plan for a day (tomorrow by default).
    Plan {
        /// Target date, YYYY-MM-DD.
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Extra instructions for the planner.
        #[arg(short, long, default_value = "")]
        guidance: String,
    },
    /// Interactive session.
    Shell,
}
