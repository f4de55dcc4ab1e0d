use crate::error::Result;
use crate::storage::{compound_key, decode_id, IdSequence, Store, Tree};
use semdex_core::models::{compute_hash, FileId, FileRecord, ProjectId};

pub struct FileStore {
    files_tree: Tree,
    project_files_tree: Tree, // project_id ++ file_id -> ()
    ids: IdSequence,
}

impl FileStore {
    pub fn new(store: &Store) -> Result<Self> {
        let files_tree = store.open_tree("files")?;
        let project_files_tree = store.open_tree("project_files")?;
        let ids = IdSequence::open(store, &files_tree, "files")?;
        Ok(Self {
            files_tree,
            project_files_tree,
            ids,
        })
    }

    pub fn create(&self, project_id: ProjectId, path: &str, content: &str) -> Result<FileRecord> {
        let record = FileRecord {
            id: self.ids.next()?,
            project_id,
            path: path.to_string(),
            content: content.to_string(),
            content_hash: compute_hash(content),
            size: content.len() as u64,
        };
        self.files_tree
            .insert_encoded(record.id.to_be_bytes(), &record)?;
        self.project_files_tree
            .insert(compound_key(project_id, record.id), b"")?;
        Ok(record)
    }

    pub fn get(&self, id: FileId) -> Result<Option<FileRecord>> {
        self.files_tree.get_decoded(id.to_be_bytes())
    }

    pub fn exists(&self, id: FileId) -> Result<bool> {
        self.files_tree.contains_key(id.to_be_bytes())
    }

    pub fn ids_for_project(&self, project_id: ProjectId) -> Result<Vec<FileId>> {
        self.project_files_tree
            .scan_prefix(project_id.to_be_bytes())
            .map(|item| item.map(|(key, _)| decode_id(&key, 8)))
            .collect()
    }

    pub fn list_for_project(&self, project_id: ProjectId) -> Result<Vec<FileRecord>> {
        let mut files = Vec::new();
        for id in self.ids_for_project(project_id)? {
            if let Some(record) = self.get(id)? {
                files.push(record);
            }
        }
        Ok(files)
    }

    pub fn count_for_project(&self, project_id: ProjectId) -> Result<usize> {
        let mut count = 0;
        for item in self.project_files_tree.scan_prefix(project_id.to_be_bytes()) {
            item?;
            count += 1;
        }
        Ok(count)
    }

    pub fn delete(&self, id: FileId) -> Result<()> {
        if let Some(record) = self.get(id)? {
            self.project_files_tree
                .remove(compound_key(record.project_id, id))?;
        }
        self.files_tree.remove(id.to_be_bytes())?;
        Ok(())
    }
}
