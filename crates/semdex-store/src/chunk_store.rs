use crate::error::Result;
use crate::storage::{compound_key, decode_id, IdSequence, Store, Tree};
use semdex_core::models::{Chunk, ChunkId, ChunkSpan, FileId};

pub struct ChunkStore {
    chunks_tree: Tree,
    file_chunks_tree: Tree, // file_id ++ chunk_id -> ()
    ids: IdSequence,
}

impl ChunkStore {
    pub fn new(store: &Store) -> Result<Self> {
        let chunks_tree = store.open_tree("chunks")?;
        let file_chunks_tree = store.open_tree("file_chunks")?;
        let ids = IdSequence::open(store, &chunks_tree, "chunks")?;
        Ok(Self {
            chunks_tree,
            file_chunks_tree,
            ids,
        })
    }

    pub fn create(&self, file_id: FileId, span: &ChunkSpan) -> Result<Chunk> {
        let chunk = Chunk {
            id: self.ids.next()?,
            file_id,
            start_line: span.start_line,
            end_line: span.end_line,
            text: span.text.clone(),
        };
        self.chunks_tree
            .insert_encoded(chunk.id.to_be_bytes(), &chunk)?;
        self.file_chunks_tree
            .insert(compound_key(file_id, chunk.id), b"")?;
        Ok(chunk)
    }

    pub fn get(&self, id: ChunkId) -> Result<Option<Chunk>> {
        self.chunks_tree.get_decoded(id.to_be_bytes())
    }

    pub fn exists(&self, id: ChunkId) -> Result<bool> {
        self.chunks_tree.contains_key(id.to_be_bytes())
    }

    pub fn ids_for_file(&self, file_id: FileId) -> Result<Vec<ChunkId>> {
        self.file_chunks_tree
            .scan_prefix(file_id.to_be_bytes())
            .map(|item| item.map(|(key, _)| decode_id(&key, 8)))
            .collect()
    }

    /// Chunks of one file in creation order.
    pub fn list_for_file(&self, file_id: FileId) -> Result<Vec<Chunk>> {
        let mut chunks = Vec::new();
        for id in self.ids_for_file(file_id)? {
            if let Some(chunk) = self.get(id)? {
                chunks.push(chunk);
            }
        }
        Ok(chunks)
    }

    pub fn count_for_file(&self, file_id: FileId) -> Result<usize> {
        let mut count = 0;
        for item in self.file_chunks_tree.scan_prefix(file_id.to_be_bytes()) {
            item?;
            count += 1;
        }
        Ok(count)
    }

    /// Remove every chunk of `file_id`, returning the removed ids.
    pub fn delete_for_file(&self, file_id: FileId) -> Result<Vec<ChunkId>> {
        let ids = self.ids_for_file(file_id)?;
        for id in &ids {
            self.chunks_tree.remove(id.to_be_bytes())?;
            self.file_chunks_tree.remove(compound_key(file_id, *id))?;
        }
        Ok(ids)
    }
}
