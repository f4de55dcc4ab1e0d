use crate::error::{IndexError, Result};
use crate::vector::VectorIndex;
use semdex_core::models::ProjectId;
use semdex_core::traits::Embedder;
use semdex_store::IndexStore;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Default)]
struct Handles {
    loaded: HashMap<ProjectId, Arc<VectorIndex>>,
    retired: HashSet<ProjectId>,
}

/// Process-wide map from project to its loaded [`VectorIndex`].
///
/// Handles are created on first use and shared; each carries its own writer
/// lock, so work on one project never waits on another.
pub struct IndexRegistry {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn IndexStore>,
    handles: Mutex<Handles>,
}

impl IndexRegistry {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn IndexStore>) -> Self {
        Self {
            embedder,
            store,
            handles: Mutex::new(Handles::default()),
        }
    }

    pub fn store(&self) -> &Arc<dyn IndexStore> {
        &self.store
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// The project's index, loading it from the store if this process has not yet.
    /// Fails with `NotFound` once the project has been retired.
    pub fn get(&self, project_id: ProjectId) -> Result<Arc<VectorIndex>> {
        {
            let handles = self.lock();
            check_live(&handles, project_id)?;
            if let Some(index) = handles.loaded.get(&project_id) {
                return Ok(index.clone());
            }
        }

        // Load outside the map lock; if another thread won the race, keep its handle.
        let index = Arc::new(VectorIndex::load(
            project_id,
            self.embedder.clone(),
            self.store.clone(),
        )?);
        let mut handles = self.lock();
        check_live(&handles, project_id)?;
        Ok(handles.loaded.entry(project_id).or_insert(index).clone())
    }

    pub fn loaded(&self, project_id: ProjectId) -> Option<Arc<VectorIndex>> {
        self.lock().loaded.get(&project_id).cloned()
    }

    /// Forget the project for good: drop its handle, wait out any write in
    /// progress on it, and refuse every later `get`. The persisted objects are
    /// left for the caller to delete.
    pub fn retire(&self, project_id: ProjectId) {
        let handle = {
            let mut handles = self.lock();
            handles.retired.insert(project_id);
            handles.loaded.remove(&project_id)
        };
        if let Some(index) = handle {
            index.retire();
        }
        debug!("retired index handle for project {}", project_id);
    }

    fn lock(&self) -> MutexGuard<'_, Handles> {
        self.handles.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn check_live(handles: &Handles, project_id: ProjectId) -> Result<()> {
    if handles.retired.contains(&project_id) {
        return Err(IndexError::NotFound {
            kind: "project",
            id: project_id,
        });
    }
    Ok(())
}
