use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the virtual environment and install required packages
    Setup {
        /// Delete and recreate the environment
        #[arg(long)]
        force: bool,
    },

    /// Translate a single text
    Translate {
        /// Text to translate
        #[arg(short, long)]
        text: String,

        /// Target language code (e.g., fra, kor_Hang)
        #[arg(long)]
        to: String,

        /// Model index (see `models`), defaults to 0
        #[arg(short, long)]
        model: Option<usize>,
    },

    /// Translate every line of a text file
    Batch {
        /// Input file, one text per line
        #[arg(short, long)]
        input: PathBuf,

        /// Target language code
        #[arg(long)]
        to: String,

        /// Model index (see `models`), defaults to 0
        #[arg(short, long)]
        model: Option<usize>,

        /// Output file for translations; stdout when absent
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List available translation models
    Models,

    /// List accepted target language codes
    Languages,

    /// Write the default configuration to a file
    InitConfig {
        /// Destination file
        #[arg(short, long, default_value = "nllb-bridge.toml")]
        path: PathBuf,
    },
}
