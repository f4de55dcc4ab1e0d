pub mod line;

pub use line::LineChunker;
pub use semdex_config::ChunkingConfig;

use crate::models::ChunkSpan;

pub trait Chunker {
    fn chunk(&self, content: &str) -> Vec<ChunkSpan>;
}
