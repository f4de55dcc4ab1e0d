use semdex_core::models::ProjectId;
use semdex_index::{IndexError, IndexRegistry, Result};
use semdex_store::Catalog;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedChunk {
    pub text: String,
    pub file_path: String,
    pub start_line: usize,
    pub end_line: usize,
    /// Squared Euclidean distance; lower is closer.
    pub score: f32,
}

/// Nearest chunks of `project_id` for `query`, closest first.
///
/// Hits whose chunk or file no longer exists, or whose file belongs to
/// another project, are dropped.
pub fn retrieve(
    catalog: &Catalog,
    registry: &IndexRegistry,
    project_id: ProjectId,
    query: &str,
    k: usize,
) -> Result<Vec<RetrievedChunk>> {
    if catalog.get_project(project_id)?.is_none() {
        return Err(IndexError::NotFound {
            kind: "project",
            id: project_id,
        });
    }

    let hits = registry.get(project_id)?.query(query, k)?;
    let mut results = Vec::with_capacity(hits.len());
    for hit in hits {
        let Some(chunk) = catalog.get_chunk(hit.chunk_id)? else {
            warn!("project {}: chunk {} is gone, skipping", project_id, hit.chunk_id);
            continue;
        };
        let Some(file) = catalog.get_file(chunk.file_id)? else {
            warn!("project {}: file {} is gone, skipping", project_id, chunk.file_id);
            continue;
        };
        if file.project_id != project_id {
            warn!(
                "project {}: chunk {} belongs to project {}, skipping",
                project_id, chunk.id, file.project_id
            );
            continue;
        }
        results.push(RetrievedChunk {
            text: chunk.text,
            file_path: file.path,
            start_line: chunk.start_line,
            end_line: chunk.end_line,
            score: hit.distance,
        });
    }
    debug!("project {}: {} results for query", project_id, results.len());
    Ok(results)
}
