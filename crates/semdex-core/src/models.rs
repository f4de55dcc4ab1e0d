use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub type ProjectId = u64;
pub type FileId = u64;
pub type ChunkId = u64;
/// Index-local identifier of one embedded chunk; dense from 0 within a project.
pub type VectorId = u64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    /// Where the files came from (directory, archive, repository URL).
    pub source: String,
    pub created_at: u64,
}

/// A source file captured at ingestion time. Never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileRecord {
    pub id: FileId,
    pub project_id: ProjectId,
    /// Path relative to the ingested root, `/`-separated.
    pub path: String,
    pub content: String,
    pub content_hash: String,
    pub size: u64,
}

/// A contiguous line range of a file; the unit of embedding and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    pub id: ChunkId,
    pub file_id: FileId,
    /// 1-indexed, inclusive.
    pub start_line: usize,
    /// 1-indexed, inclusive.
    pub end_line: usize,
    pub text: String,
}

/// Links a relational chunk to its slot in the project's vector index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VectorRecord {
    pub project_id: ProjectId,
    pub chunk_id: ChunkId,
    pub vector_id: VectorId,
}

/// Chunker output before it is assigned a relational id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSpan {
    pub start_line: usize,
    pub end_line: usize,
    pub text: String,
}

/// A file found by the scanner, decoded to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    pub relative_path: String,
    pub text: String,
}

pub fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
