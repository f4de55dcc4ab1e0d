pub mod index;
pub mod ingest;
pub mod jobs;
pub mod retrieve;
pub mod service;

pub use index::{index_project, IndexReport};
pub use ingest::{ingest_dir, ingest_files};
pub use jobs::{JobId, JobState, JobTracker};
pub use retrieve::{retrieve, RetrievedChunk};
pub use semdex_index::{IndexError, Result};
pub use service::{ProjectStatus, SearchService};
