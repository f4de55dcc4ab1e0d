use crate::index::{index_project, IndexReport};
use crate::ingest::ingest_dir;
use crate::jobs::{JobId, JobState, JobTracker};
use crate::retrieve::{retrieve, RetrievedChunk};
use semdex_config::{Config, IndexBackend, Validate};
use semdex_core::chunking::LineChunker;
use semdex_core::embeddings::select_embedder;
use semdex_core::models::{Project, ProjectId};
use semdex_core::traits::Embedder;
use semdex_index::{IndexError, IndexRegistry, Result};
use semdex_store::{Catalog, FsIndexStore, IndexStore, SledIndexStore, Store, StoreError};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectStatus {
    pub project: Project,
    pub files: usize,
    pub chunks: usize,
    pub vector_records: usize,
    /// Vectors held by the project's index.
    pub indexed_vectors: usize,
}

/// Entry point tying catalog, vector indexes, and background jobs together.
pub struct SearchService {
    config: Config,
    catalog: Arc<Catalog>,
    registry: Arc<IndexRegistry>,
    chunker: LineChunker,
    jobs: JobTracker,
}

impl SearchService {
    /// Open (or create) the data directory named by `config.core.data_dir`.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        let data_dir = config.core.data_dir.clone();
        fs::create_dir_all(&data_dir).map_err(|source| StoreError::Io {
            path: data_dir.clone(),
            source,
        })?;

        let store = Store::open(&data_dir.join("catalog"))?;
        let catalog = Catalog::new(store.clone())?;
        let index_store: Arc<dyn IndexStore> = match config.core.index_backend {
            IndexBackend::Fs => Arc::new(FsIndexStore::new(data_dir.join("indexes"))),
            IndexBackend::Sled => Arc::new(SledIndexStore::new(&store)?),
        };
        let embedder = select_embedder(&config.embedding).map_err(IndexError::Provider)?;
        info!(
            "opened {} ({:?} index backend, {}-dimensional embeddings)",
            data_dir.display(),
            config.core.index_backend,
            embedder.dimension()
        );
        Self::with_parts(config, catalog, embedder, index_store)
    }

    /// Assemble a service from explicit parts.
    pub fn with_parts(
        config: Config,
        catalog: Catalog,
        embedder: Arc<dyn Embedder>,
        index_store: Arc<dyn IndexStore>,
    ) -> Result<Self> {
        let chunker = LineChunker::new(config.chunking)?;
        Ok(Self {
            catalog: Arc::new(catalog),
            registry: Arc::new(IndexRegistry::new(embedder, index_store)),
            chunker,
            jobs: JobTracker::new(),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn registry(&self) -> &IndexRegistry {
        &self.registry
    }

    pub fn create_project(&self, name: &str, source: &str) -> Result<Project> {
        Ok(self.catalog.create_project(name, source)?)
    }

    /// Create a project and ingest the files under `root`. Returns the project and the file count.
    pub fn create_project_from_dir(&self, name: &str, root: &Path) -> Result<(Project, usize)> {
        if !root.is_dir() {
            return Err(IndexError::Validation(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        let project = self
            .catalog
            .create_project(name, &root.display().to_string())?;
        let files = ingest_dir(&self.catalog, project.id, root, &self.config.core)?;
        self.catalog.flush()?;
        Ok((project, files.len()))
    }

    pub fn index_project(&self, project_id: ProjectId) -> Result<IndexReport> {
        index_project(&self.catalog, &self.registry, &self.chunker, project_id)
    }

    /// Start indexing on a background thread and return the job to poll.
    pub fn spawn_index(&self, project_id: ProjectId) -> Result<JobId> {
        self.require_project(project_id)?;
        let catalog = self.catalog.clone();
        let registry = self.registry.clone();
        let chunker = self.chunker;
        Ok(self.jobs.spawn(project_id, move || {
            index_project(&catalog, &registry, &chunker, project_id).map(|report| report.chunks)
        }))
    }

    pub fn job_state(&self, job_id: JobId) -> Option<JobState> {
        self.jobs.state(job_id)
    }

    pub fn wait_job(&self, job_id: JobId) -> Option<JobState> {
        self.jobs.wait(job_id)
    }

    pub fn jobs_for_project(&self, project_id: ProjectId) -> Vec<(JobId, JobState)> {
        self.jobs.jobs_for_project(project_id)
    }

    /// `top_k` falls back to `search.top_k` from the config.
    pub fn retrieve(
        &self,
        project_id: ProjectId,
        query: &str,
        top_k: Option<usize>,
    ) -> Result<Vec<RetrievedChunk>> {
        let k = top_k.unwrap_or(self.config.search.top_k);
        retrieve(&self.catalog, &self.registry, project_id, query, k)
    }

    pub fn project_status(&self, project_id: ProjectId) -> Result<ProjectStatus> {
        let project = self.require_project(project_id)?;
        Ok(ProjectStatus {
            files: self.catalog.count_files(project_id)?,
            chunks: self.catalog.count_chunks(project_id)?,
            vector_records: self.catalog.count_vector_records(project_id)?,
            indexed_vectors: self.registry.get(project_id)?.len(),
            project,
        })
    }

    pub fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.catalog.list_projects()?)
    }

    /// Remove the project's rows and index objects and retire its index.
    ///
    /// Refused with `Busy` while a background index job for the project is
    /// pending or running. Any other writer still holding the index fails
    /// from here on instead of writing the objects back.
    pub fn delete_project(&self, project_id: ProjectId) -> Result<()> {
        self.require_project(project_id)?;
        if self
            .jobs
            .jobs_for_project(project_id)
            .iter()
            .any(|(_, state)| !state.is_finished())
        {
            return Err(IndexError::Busy(project_id));
        }
        self.registry.retire(project_id);
        self.registry.store().delete_project(project_id)?;
        self.catalog.delete_project(project_id)?;
        self.catalog.flush()?;
        info!("deleted project {}", project_id);
        Ok(())
    }

    fn require_project(&self, project_id: ProjectId) -> Result<Project> {
        self.catalog
            .get_project(project_id)?
            .ok_or(IndexError::NotFound {
                kind: "project",
                id: project_id,
            })
    }
}
