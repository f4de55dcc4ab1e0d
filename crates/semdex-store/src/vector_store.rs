use crate::error::{Result, StoreError};
use crate::storage::{compound_key, decode_id, Store, Tree};
use semdex_core::models::{ChunkId, ProjectId, VectorRecord};

/// Chunk to vector-slot links. At most one record per chunk.
pub struct VectorRecordStore {
    records_tree: Tree, // chunk_id -> VectorRecord
    project_records_tree: Tree, // project_id ++ chunk_id -> ()
}

impl VectorRecordStore {
    pub fn new(store: &Store) -> Result<Self> {
        Ok(Self {
            records_tree: store.open_tree("vector_records")?,
            project_records_tree: store.open_tree("project_vector_records")?,
        })
    }

    pub fn insert(&self, record: VectorRecord) -> Result<()> {
        let bytes = bincode::serialize(&record)?;
        if !self
            .records_tree
            .insert_if_absent(record.chunk_id.to_be_bytes(), bytes)?
        {
            return Err(StoreError::Duplicate {
                kind: "vector record for chunk",
                id: record.chunk_id,
            });
        }
        self.project_records_tree
            .insert(compound_key(record.project_id, record.chunk_id), b"")?;
        Ok(())
    }

    pub fn get_for_chunk(&self, chunk_id: ChunkId) -> Result<Option<VectorRecord>> {
        self.records_tree.get_decoded(chunk_id.to_be_bytes())
    }

    pub fn count_for_project(&self, project_id: ProjectId) -> Result<usize> {
        let mut count = 0;
        for item in self
            .project_records_tree
            .scan_prefix(project_id.to_be_bytes())
        {
            item?;
            count += 1;
        }
        Ok(count)
    }

    pub fn delete_for_project(&self, project_id: ProjectId) -> Result<usize> {
        let chunk_ids: Vec<ChunkId> = self
            .project_records_tree
            .scan_prefix(project_id.to_be_bytes())
            .map(|item| item.map(|(key, _)| decode_id(&key, 8)))
            .collect::<Result<_>>()?;
        for chunk_id in &chunk_ids {
            self.records_tree.remove(chunk_id.to_be_bytes())?;
            self.project_records_tree
                .remove(compound_key(project_id, *chunk_id))?;
        }
        Ok(chunk_ids.len())
    }
}
