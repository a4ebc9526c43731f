use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "finterm", about = "Financial terminology vector knowledge base")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full load: read a (term, category) CSV, embed and import it
    Load {
        /// CSV file with two unlabeled columns: term, category
        #[arg(long, default_value = "data/finance_terms.csv")]
        csv: PathBuf,
        /// Cap the number of rows for a test run (overrides config)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Similarity search over the stored terms
    Search {
        query: String,
        #[arg(long, default_value = "5")]
        top_k: usize,
    },
    /// Show collection statistics
    Stats,
    /// Launch the web UI
    Serve {
        /// Bind host (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
}
