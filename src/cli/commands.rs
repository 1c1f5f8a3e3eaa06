//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mtimeline")]
#[command(about = "Milestone timelines from markdown notes", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a timeline root
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// View or modify configuration
    Config {
        /// Config key to get or set
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all configuration
        #[arg(short, long)]
        list: bool,
    },

    /// Print every milestone in date order
    Timeline {
        /// Sort order for this run (asc, desc)
        #[arg(short, long)]
        sort: Option<String>,

        /// Month-name language for this run (en, es, fr, ja)
        #[arg(long)]
        lang: Option<String>,

        /// Numeric date order for this run (US, International)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// List untagged four-digit years for review
    Years,

    /// Tag a year on one line with #year/<YEAR>
    TagYear {
        /// Document path relative to the timeline root
        file: String,

        /// 1-based line number
        line: usize,

        /// Year to tag
        year: u32,
    },

    /// Open a document in the editor, optionally at a line
    Open {
        /// Document path relative to the timeline root
        file: String,

        /// 1-based line number
        #[arg(short, long)]
        line: Option<usize>,
    },
}
