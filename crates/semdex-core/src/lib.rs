pub mod chunking;
pub mod embeddings;
pub mod models;
pub mod scanner;
pub mod traits;
