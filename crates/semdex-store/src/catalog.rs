//! Relational catalog of projects, files, chunks and vector records.
//!
//! Every entity lives in its own sled tree; parent/child links are kept in
//! side trees keyed by `parent_id ++ child_id` so listing children is a
//! prefix scan.

use crate::chunk_store::ChunkStore;
use crate::error::{Result, StoreError};
use crate::file_store::FileStore;
use crate::project_store::ProjectStore;
use crate::storage::Store;
use crate::vector_store::VectorRecordStore;
use semdex_core::models::{
    Chunk, ChunkId, ChunkSpan, FileId, FileRecord, Project, ProjectId, VectorRecord,
};
use std::path::Path;
use tracing::debug;

pub struct Catalog {
    store: Store,
    projects: ProjectStore,
    files: FileStore,
    chunks: ChunkStore,
    vector_records: VectorRecordStore,
}

impl Catalog {
    pub fn open(path: &Path) -> Result<Self> {
        Self::new(Store::open(path)?)
    }

    pub fn temporary() -> Result<Self> {
        Self::new(Store::temporary()?)
    }

    pub fn new(store: Store) -> Result<Self> {
        Ok(Self {
            projects: ProjectStore::new(&store)?,
            files: FileStore::new(&store)?,
            chunks: ChunkStore::new(&store)?,
            vector_records: VectorRecordStore::new(&store)?,
            store,
        })
    }

    pub fn flush(&self) -> Result<()> {
        self.store.flush()
    }

    pub fn create_project(&self, name: &str, source: &str) -> Result<Project> {
        let project = self.projects.create(name, source)?;
        debug!("created project {} ({})", project.id, project.name);
        Ok(project)
    }

    pub fn get_project(&self, id: ProjectId) -> Result<Option<Project>> {
        self.projects.get(id)
    }

    pub fn list_projects(&self) -> Result<Vec<Project>> {
        self.projects.list()
    }

    /// Remove a project with its files, chunks and vector records.
    /// Returns false when the project did not exist.
    pub fn delete_project(&self, id: ProjectId) -> Result<bool> {
        if !self.projects.exists(id)? {
            return Ok(false);
        }
        let mut removed_chunks = 0;
        for file_id in self.files.ids_for_project(id)? {
            removed_chunks += self.chunks.delete_for_file(file_id)?.len();
            self.files.delete(file_id)?;
        }
        let removed_records = self.vector_records.delete_for_project(id)?;
        self.projects.delete(id)?;
        debug!(
            "deleted project {}: {} chunks, {} vector records",
            id, removed_chunks, removed_records
        );
        Ok(true)
    }

    pub fn add_file(&self, project_id: ProjectId, path: &str, content: &str) -> Result<FileRecord> {
        if !self.projects.exists(project_id)? {
            return Err(StoreError::Missing {
                kind: "project",
                id: project_id,
            });
        }
        self.files.create(project_id, path, content)
    }

    pub fn get_file(&self, id: FileId) -> Result<Option<FileRecord>> {
        self.files.get(id)
    }

    pub fn files_for_project(&self, project_id: ProjectId) -> Result<Vec<FileRecord>> {
        self.files.list_for_project(project_id)
    }

    pub fn count_files(&self, project_id: ProjectId) -> Result<usize> {
        self.files.count_for_project(project_id)
    }

    pub fn add_chunk(&self, file_id: FileId, span: &ChunkSpan) -> Result<Chunk> {
        if !self.files.exists(file_id)? {
            return Err(StoreError::Missing {
                kind: "file",
                id: file_id,
            });
        }
        self.chunks.create(file_id, span)
    }

    pub fn get_chunk(&self, id: ChunkId) -> Result<Option<Chunk>> {
        self.chunks.get(id)
    }

    /// Chunks of one file in creation order.
    pub fn chunks_for_file(&self, file_id: FileId) -> Result<Vec<Chunk>> {
        self.chunks.list_for_file(file_id)
    }

    /// Every chunk of a project, ordered by file id then chunk id.
    pub fn chunks_for_project(&self, project_id: ProjectId) -> Result<Vec<Chunk>> {
        let mut chunks = Vec::new();
        for file_id in self.files.ids_for_project(project_id)? {
            chunks.extend(self.chunks_for_file(file_id)?);
        }
        Ok(chunks)
    }

    pub fn count_chunks(&self, project_id: ProjectId) -> Result<usize> {
        let mut count = 0;
        for file_id in self.files.ids_for_project(project_id)? {
            count += self.chunks.count_for_file(file_id)?;
        }
        Ok(count)
    }

    /// Link a chunk to its vector slot. A chunk can be linked once.
    pub fn add_vector_record(&self, record: VectorRecord) -> Result<()> {
        if !self.chunks.exists(record.chunk_id)? {
            return Err(StoreError::Missing {
                kind: "chunk",
                id: record.chunk_id,
            });
        }
        self.vector_records.insert(record)
    }

    pub fn vector_record_for_chunk(&self, chunk_id: ChunkId) -> Result<Option<VectorRecord>> {
        self.vector_records.get_for_chunk(chunk_id)
    }

    pub fn count_vector_records(&self, project_id: ProjectId) -> Result<usize> {
        self.vector_records.count_for_project(project_id)
    }
}
