use crate::error::Result;
use crate::storage::{IdSequence, Store, Tree};
use semdex_core::models::{Project, ProjectId};
use std::time::{SystemTime, UNIX_EPOCH};

pub struct ProjectStore {
    projects_tree: Tree,
    ids: IdSequence,
}

impl ProjectStore {
    pub fn new(store: &Store) -> Result<Self> {
        let projects_tree = store.open_tree("projects")?;
        let ids = IdSequence::open(store, &projects_tree, "projects")?;
        Ok(Self { projects_tree, ids })
    }

    pub fn create(&self, name: &str, source: &str) -> Result<Project> {
        let project = Project {
            id: self.ids.next()?,
            name: name.to_string(),
            source: source.to_string(),
            created_at: unix_now(),
        };
        self.projects_tree
            .insert_encoded(project.id.to_be_bytes(), &project)?;
        Ok(project)
    }

    pub fn get(&self, id: ProjectId) -> Result<Option<Project>> {
        self.projects_tree.get_decoded(id.to_be_bytes())
    }

    pub fn exists(&self, id: ProjectId) -> Result<bool> {
        self.projects_tree.contains_key(id.to_be_bytes())
    }

    /// All projects in id order.
    pub fn list(&self) -> Result<Vec<Project>> {
        let mut projects = Vec::new();
        for item in self.projects_tree.iter() {
            let (_, bytes) = item?;
            projects.push(bincode::deserialize(&bytes)?);
        }
        Ok(projects)
    }

    pub fn delete(&self, id: ProjectId) -> Result<bool> {
        Ok(self.projects_tree.remove(id.to_be_bytes())?.is_some())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
