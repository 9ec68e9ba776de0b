//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docent")]
#[command(about = "Docent - ask questions about documents with a local model", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Explicit configuration file (defaults to .docent/config.yaml)
    #[arg(short, long, global = true, env = "DOCENT_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check the connection to the inference endpoint
    Status,

    /// List models installed on the inference endpoint
    Models,

    /// Ask a single question
    Ask {
        /// The question (positional argument)
        question: String,

        /// Plain-text document to ground the answer in
        #[arg(short, long)]
        document: Option<PathBuf>,

        /// Answer without retrieval, even if a document is given
        #[arg(short, long)]
        general: bool,
    },

    /// Interactive chat, optionally over a document
    Chat {
        /// Plain-text document to ground answers in
        #[arg(short, long)]
        document: Option<PathBuf>,
    },
}
