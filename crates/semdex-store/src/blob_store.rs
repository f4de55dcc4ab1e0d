//! Opaque byte storage for per-project index blobs.
//!
//! Objects are addressed as `project_<id>/<name>`. A `put` either fully
//! replaces the previous object or leaves it untouched.

use crate::error::{Result, StoreError};
use crate::storage::{Store, Tree};
use semdex_core::models::ProjectId;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

pub trait IndexStore: Send + Sync {
    fn put(&self, project_id: ProjectId, name: &str, bytes: &[u8]) -> Result<()>;
    fn get(&self, project_id: ProjectId, name: &str) -> Result<Option<Vec<u8>>>;
    /// Remove every object of the project. Missing projects are not an error.
    fn delete_project(&self, project_id: ProjectId) -> Result<()>;
}

pub fn project_prefix(project_id: ProjectId) -> String {
    format!("project_{}", project_id)
}

pub fn object_key(project_id: ProjectId, name: &str) -> String {
    format!("{}/{}", project_prefix(project_id), name)
}

fn check_name(name: &str) -> Result<()> {
    if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Objects as files under `root/project_<id>/<name>`, replaced via temp file + fsync + rename.
pub struct FsIndexStore {
    root: PathBuf,
    tmp_seq: AtomicU64,
}

impl FsIndexStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            tmp_seq: AtomicU64::new(0),
        }
    }

    fn project_dir(&self, project_id: ProjectId) -> PathBuf {
        self.root.join(project_prefix(project_id))
    }
}

impl IndexStore for FsIndexStore {
    fn put(&self, project_id: ProjectId, name: &str, bytes: &[u8]) -> Result<()> {
        check_name(name)?;
        let dir = self.project_dir(project_id);
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let target = dir.join(name);
        let seq = self.tmp_seq.fetch_add(1, Ordering::Relaxed);
        let tmp = dir.join(format!(".{}.{}.{}.tmp", name, std::process::id(), seq));

        let write_tmp = || -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(bytes)?;
            file.sync_all()
        };
        if let Err(e) = write_tmp() {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::io(&tmp, e));
        }
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::io(&target, e));
        }
        sync_dir(&dir)?;
        debug!("wrote {} ({} bytes)", target.display(), bytes.len());
        Ok(())
    }

    fn get(&self, project_id: ProjectId, name: &str) -> Result<Option<Vec<u8>>> {
        check_name(name)?;
        let path = self.project_dir(project_id).join(name);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    fn delete_project(&self, project_id: ProjectId) -> Result<()> {
        let dir = self.project_dir(project_id);
        match fs::remove_dir_all(&dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&dir, e)),
        }
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    fs::File::open(dir)
        .and_then(|d| d.sync_all())
        .map_err(|e| StoreError::io(dir, e))
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}

/// Objects as values in a sled tree keyed by `project_<id>/<name>`.
pub struct SledIndexStore {
    blobs: Tree,
}

impl SledIndexStore {
    pub fn new(store: &Store) -> Result<Self> {
        Ok(Self {
            blobs: store.open_tree("index_blobs")?,
        })
    }
}

impl IndexStore for SledIndexStore {
    fn put(&self, project_id: ProjectId, name: &str, bytes: &[u8]) -> Result<()> {
        check_name(name)?;
        self.blobs.insert(object_key(project_id, name), bytes)
    }

    fn get(&self, project_id: ProjectId, name: &str) -> Result<Option<Vec<u8>>> {
        check_name(name)?;
        self.blobs.get(object_key(project_id, name))
    }

    fn delete_project(&self, project_id: ProjectId) -> Result<()> {
        let prefix = format!("{}/", project_prefix(project_id));
        let keys: Vec<Vec<u8>> = self
            .blobs
            .scan_prefix(prefix.as_bytes())
            .map(|item| item.map(|(key, _)| key))
            .collect::<Result<_>>()?;
        for key in keys {
            self.blobs.remove(key)?;
        }
        Ok(())
    }
}
