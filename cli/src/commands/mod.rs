pub mod context;
pub mod index;
pub mod ingest;
pub mod projects;
pub mod search;
pub mod status;
pub mod ui;

pub use index::handle_index;
pub use ingest::handle_ingest;
pub use projects::{handle_delete, handle_list};
pub use search::handle_search;
pub use status::handle_status;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "semdex")]
#[command(about = "Per-project semantic code search over line-window chunks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a project from a directory of sources
    Ingest {
        /// Directory to walk
        dir: PathBuf,

        /// Project name (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,

        /// Index the project right after ingesting
        #[arg(long)]
        index: bool,
    },
    /// Chunk and embed a project's files
    Index {
        /// Project id or name
        project: String,

        /// Run as a tracked background job and report its outcome
        #[arg(long)]
        background: bool,
    },
    /// Search a project
    Search {
        /// Project id or name
        project: String,

        /// The query string
        query: String,

        /// Number of results (defaults to search.top_k)
        #[arg(long)]
        top: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show file, chunk and vector counts for a project
    Status {
        /// Project id or name
        project: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List projects
    List,
    /// Delete a project and its index
    Delete {
        /// Project id or name
        project: String,
    },
}
