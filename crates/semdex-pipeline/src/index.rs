use semdex_core::chunking::Chunker;
use semdex_core::models::{ChunkId, ProjectId, VectorId, VectorRecord};
use semdex_index::{IndexError, IndexRegistry, Result};
use semdex_store::Catalog;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexReport {
    pub project_id: ProjectId,
    pub files: usize,
    pub chunks: usize,
    /// Vector ids assigned in this run, in chunk order.
    pub vector_ids: Vec<VectorId>,
}

/// Chunk every file of the project, embed all chunks in one batch, and link them.
///
/// Running this twice on the same project adds a second copy of every chunk
/// and vector; nothing is deduplicated. If embedding or index storage fails,
/// the chunks written so far stay in the catalog without vector records.
pub fn index_project(
    catalog: &Catalog,
    registry: &IndexRegistry,
    chunker: &dyn Chunker,
    project_id: ProjectId,
) -> Result<IndexReport> {
    if catalog.get_project(project_id)?.is_none() {
        return Err(IndexError::NotFound {
            kind: "project",
            id: project_id,
        });
    }

    let files = catalog.files_for_project(project_id)?;
    let mut texts: Vec<String> = Vec::new();
    let mut chunk_ids: Vec<ChunkId> = Vec::new();
    for file in &files {
        let spans = chunker.chunk(&file.content);
        debug!("{}: {} chunks", file.path, spans.len());
        for span in &spans {
            let chunk = catalog.add_chunk(file.id, span)?;
            chunk_ids.push(chunk.id);
            texts.push(chunk.text);
        }
    }

    let vector_ids = if texts.is_empty() {
        Vec::new()
    } else {
        let index = registry.get(project_id)?;
        let vector_ids = index.add_vectors(&texts, &chunk_ids)?;
        for (&vector_id, &chunk_id) in vector_ids.iter().zip(&chunk_ids) {
            catalog.add_vector_record(VectorRecord {
                project_id,
                chunk_id,
                vector_id,
            })?;
        }
        vector_ids
    };
    catalog.flush()?;

    info!(
        "indexed project {}: {} files, {} chunks",
        project_id,
        files.len(),
        chunk_ids.len()
    );
    Ok(IndexReport {
        project_id,
        files: files.len(),
        chunks: chunk_ids.len(),
        vector_ids,
    })
}
