use semdex_config::{ChunkingConfig, Config, IndexBackend};
use semdex_core::embeddings::HashEmbedder;
use semdex_core::traits::Embedder;
use semdex_pipeline::{IndexError, JobState, SearchService};
use semdex_store::{Catalog, FsIndexStore};
use std::fs;
use std::path::Path;
use std::sync::{mpsc, Arc, Mutex};
use tempfile::TempDir;

/// Hash embeddings that block until the gate's sender is dropped.
struct GatedEmbedder {
    inner: HashEmbedder,
    gate: Mutex<mpsc::Receiver<()>>,
}

impl Embedder for GatedEmbedder {
    fn embed(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        let _ = self.gate.lock().unwrap().recv();
        self.inner.embed(texts)
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}

fn numbered_lines(tag: &str, n: usize) -> String {
    (1..=n)
        .map(|i| format!("{tag}_line_{i} = compute({i})"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn small_window_config() -> Config {
    let mut config = Config::default();
    config.chunking = ChunkingConfig {
        max_lines: 10,
        overlap_lines: 2,
    };
    config
}

/// Service over a temporary catalog with indexes under `index_dir`.
fn service(config: Config, index_dir: &Path) -> SearchService {
    SearchService::with_parts(
        config,
        Catalog::temporary().unwrap(),
        Arc::new(HashEmbedder::new(64)),
        Arc::new(FsIndexStore::new(index_dir)),
    )
    .unwrap()
}

/// Two 42-line sources (5 chunks each with a 10/2 window) plus files the walker must skip.
fn two_file_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("alpha.py"), numbered_lines("alpha", 42)).unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src/beta.rs"), numbered_lines("beta", 42)).unwrap();
    fs::create_dir_all(dir.path().join("node_modules/dep")).unwrap();
    fs::write(dir.path().join("node_modules/dep/index.js"), "skip me").unwrap();
    fs::write(dir.path().join("logo.png"), [0x89, 0x50, 0x4e, 0x47]).unwrap();
    dir
}

#[test]
fn test_two_files_index_into_dense_vector_ids() {
    let source = two_file_tree();
    let data = tempfile::tempdir().unwrap();
    let svc = service(small_window_config(), data.path());

    let (project, files) = svc.create_project_from_dir("demo", source.path()).unwrap();
    assert_eq!(files, 2);

    let report = svc.index_project(project.id).unwrap();
    assert_eq!(report.files, 2);
    assert_eq!(report.chunks, 10);
    assert_eq!(report.vector_ids, (0..10).collect::<Vec<u64>>());

    let status = svc.project_status(project.id).unwrap();
    assert_eq!(status.files, 2);
    assert_eq!(status.chunks, 10);
    assert_eq!(status.vector_records, 10);
    assert_eq!(status.indexed_vectors, 10);

    let probe = svc.catalog().chunks_for_project(project.id).unwrap().remove(7);
    let hits = svc.retrieve(project.id, &probe.text, Some(3)).unwrap();
    assert_eq!(hits.len(), 3);
    assert!(hits.windows(2).all(|w| w[0].score <= w[1].score));
    assert_eq!(hits[0].score, 0.0);
    assert_eq!(hits[0].file_path, "src/beta.rs");
    assert_eq!((hits[0].start_line, hits[0].end_line), (17, 26));
}

#[test]
fn test_retrieve_defaults_to_configured_top_k() {
    let source = two_file_tree();
    let data = tempfile::tempdir().unwrap();
    let mut config = small_window_config();
    config.search.top_k = 4;
    let svc = service(config, data.path());

    let (project, _) = svc.create_project_from_dir("demo", source.path()).unwrap();
    svc.index_project(project.id).unwrap();
    assert_eq!(svc.retrieve(project.id, "compute", None).unwrap().len(), 4);
    assert_eq!(svc.retrieve(project.id, "compute", Some(50)).unwrap().len(), 10);
}

#[test]
fn test_reindex_appends_duplicates() {
    let source = two_file_tree();
    let data = tempfile::tempdir().unwrap();
    let svc = service(small_window_config(), data.path());
    let (project, _) = svc.create_project_from_dir("demo", source.path()).unwrap();

    svc.index_project(project.id).unwrap();
    let second = svc.index_project(project.id).unwrap();
    assert_eq!(second.vector_ids, (10..20).collect::<Vec<u64>>());

    let status = svc.project_status(project.id).unwrap();
    assert_eq!(status.chunks, 20);
    assert_eq!(status.vector_records, 20);
    assert_eq!(status.indexed_vectors, 20);
}

#[test]
fn test_cross_project_hits_are_filtered() {
    let data = tempfile::tempdir().unwrap();
    let svc = service(Config::default(), data.path());

    let a_dir = tempfile::tempdir().unwrap();
    fs::write(a_dir.path().join("secret.py"), "def alpha_marker_token(): pass").unwrap();
    let b_dir = tempfile::tempdir().unwrap();
    fs::write(b_dir.path().join("public.py"), "def beta_handler(): return 1").unwrap();

    let (a, _) = svc.create_project_from_dir("a", a_dir.path()).unwrap();
    let (b, _) = svc.create_project_from_dir("b", b_dir.path()).unwrap();
    let a_report = svc.index_project(a.id).unwrap();
    let b_report = svc.index_project(b.id).unwrap();
    assert_eq!(a_report.vector_ids, b_report.vector_ids);

    // Plant a stale entry in B's index that points at A's chunk.
    let a_chunk = svc.catalog().chunks_for_project(a.id).unwrap().remove(0);
    let b_index = svc.registry().get(b.id).unwrap();
    b_index
        .add_vectors(&[a_chunk.text.clone()], &[a_chunk.id])
        .unwrap();
    let raw = b_index.query("alpha_marker_token", 10).unwrap();
    assert!(raw.iter().any(|hit| hit.chunk_id == a_chunk.id));

    let hits = svc.retrieve(b.id, "alpha_marker_token", Some(10)).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].file_path, "public.py");

    let own = svc.retrieve(a.id, "alpha_marker_token", Some(10)).unwrap();
    assert_eq!(own[0].file_path, "secret.py");
}

#[test]
fn test_unknown_project_is_not_found() {
    let data = tempfile::tempdir().unwrap();
    let svc = service(Config::default(), data.path());
    assert!(matches!(
        svc.index_project(404),
        Err(IndexError::NotFound { kind: "project", id: 404 })
    ));
    assert!(matches!(
        svc.retrieve(404, "q", None),
        Err(IndexError::NotFound { .. })
    ));
    assert!(matches!(svc.spawn_index(404), Err(IndexError::NotFound { .. })));
    assert!(matches!(svc.delete_project(404), Err(IndexError::NotFound { .. })));
}

#[test]
fn test_project_without_sources_indexes_nothing() {
    let source = tempfile::tempdir().unwrap();
    fs::write(source.path().join("notes.txt"), "not in the allow-list").unwrap();
    let data = tempfile::tempdir().unwrap();
    let svc = service(Config::default(), data.path());

    let (project, files) = svc.create_project_from_dir("empty", source.path()).unwrap();
    assert_eq!(files, 0);
    let report = svc.index_project(project.id).unwrap();
    assert_eq!(report.chunks, 0);
    assert!(report.vector_ids.is_empty());
    assert!(svc.retrieve(project.id, "anything", None).unwrap().is_empty());
}

#[test]
fn test_background_job_reports_outcome() {
    let source = two_file_tree();
    let data = tempfile::tempdir().unwrap();
    let svc = service(small_window_config(), data.path());
    let (project, _) = svc.create_project_from_dir("demo", source.path()).unwrap();

    let job = svc.spawn_index(project.id).unwrap();
    assert_eq!(
        svc.wait_job(job),
        Some(JobState::Succeeded { indexed_chunks: 10 })
    );
    assert_eq!(svc.job_state(job), Some(JobState::Succeeded { indexed_chunks: 10 }));
    assert_eq!(svc.jobs_for_project(project.id).len(), 1);
    assert_eq!(svc.project_status(project.id).unwrap().vector_records, 10);
}

#[test]
fn test_delete_project_removes_rows_and_index() {
    let source = two_file_tree();
    let data = tempfile::tempdir().unwrap();
    let svc = service(small_window_config(), data.path());
    let (doomed, _) = svc.create_project_from_dir("doomed", source.path()).unwrap();
    let (kept, _) = svc.create_project_from_dir("kept", source.path()).unwrap();
    svc.index_project(doomed.id).unwrap();
    svc.index_project(kept.id).unwrap();

    let index_dir = data.path().join(format!("project_{}", doomed.id));
    assert!(index_dir.exists());

    svc.delete_project(doomed.id).unwrap();
    assert!(!index_dir.exists());
    assert!(svc.registry().loaded(doomed.id).is_none());
    assert!(matches!(
        svc.project_status(doomed.id),
        Err(IndexError::NotFound { .. })
    ));

    let names: Vec<String> = svc.list_projects().unwrap().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["kept"]);
    assert_eq!(svc.project_status(kept.id).unwrap().indexed_vectors, 10);
}

#[test]
fn test_open_persists_across_restarts_with_sled_backend() {
    let source = two_file_tree();
    let data = tempfile::tempdir().unwrap();
    let mut config = small_window_config();
    config.core.data_dir = data.path().join("state");
    config.core.index_backend = IndexBackend::Sled;
    config.embedding.dimension = 32;

    let (project_id, before) = {
        let svc = SearchService::open(config.clone()).unwrap();
        let (project, _) = svc.create_project_from_dir("demo", source.path()).unwrap();
        svc.index_project(project.id).unwrap();
        let hits = svc.retrieve(project.id, "alpha_line_7", Some(3)).unwrap();
        (project.id, hits)
    };

    let svc = SearchService::open(config).unwrap();
    let status = svc.project_status(project_id).unwrap();
    assert_eq!(status.chunks, 10);
    assert_eq!(status.indexed_vectors, 10);
    assert_eq!(svc.retrieve(project_id, "alpha_line_7", Some(3)).unwrap(), before);
}

#[test]
fn test_invalid_chunking_config_is_rejected() {
    let data = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.chunking.overlap_lines = config.chunking.max_lines;
    let result = SearchService::with_parts(
        config,
        Catalog::temporary().unwrap(),
        Arc::new(HashEmbedder::new(8)),
        Arc::new(FsIndexStore::new(data.path())),
    );
    assert!(matches!(result, Err(IndexError::Config(_))));
}

#[test]
fn test_delete_during_job_is_refused_and_ids_are_not_reused() {
    let source = two_file_tree();
    let data = tempfile::tempdir().unwrap();
    let catalog_dir = data.path().join("catalog");
    let index_dir = data.path().join("indexes");
    let (open_gate, gate) = mpsc::channel::<()>();

    let old_id = {
        let svc = SearchService::with_parts(
            small_window_config(),
            Catalog::open(&catalog_dir).unwrap(),
            Arc::new(GatedEmbedder {
                inner: HashEmbedder::new(64),
                gate: Mutex::new(gate),
            }),
            Arc::new(FsIndexStore::new(&index_dir)),
        )
        .unwrap();
        let (project, _) = svc.create_project_from_dir("doomed", source.path()).unwrap();

        let job = svc.spawn_index(project.id).unwrap();
        assert!(matches!(
            svc.delete_project(project.id),
            Err(IndexError::Busy(id)) if id == project.id
        ));
        assert!(svc.project_status(project.id).is_ok());

        drop(open_gate);
        assert_eq!(
            svc.wait_job(job),
            Some(JobState::Succeeded { indexed_chunks: 10 })
        );
        svc.delete_project(project.id).unwrap();
        assert!(!index_dir.join(format!("project_{}", project.id)).exists());
        project.id
    };

    let svc = SearchService::with_parts(
        small_window_config(),
        Catalog::open(&catalog_dir).unwrap(),
        Arc::new(HashEmbedder::new(64)),
        Arc::new(FsIndexStore::new(&index_dir)),
    )
    .unwrap();
    let (fresh, _) = svc.create_project_from_dir("fresh", source.path()).unwrap();
    assert!(fresh.id > old_id);
    let before = svc.project_status(fresh.id).unwrap();
    assert_eq!((before.chunks, before.indexed_vectors), (0, 0));

    let report = svc.index_project(fresh.id).unwrap();
    assert_eq!(report.vector_ids, (0..10).collect::<Vec<u64>>());
    let after = svc.project_status(fresh.id).unwrap();
    assert_eq!(after.vector_records, after.indexed_vectors);
}

#[test]
fn test_deleted_project_index_cannot_be_written_back() {
    let source = two_file_tree();
    let data = tempfile::tempdir().unwrap();
    let svc = service(small_window_config(), data.path());
    let (project, _) = svc.create_project_from_dir("doomed", source.path()).unwrap();
    svc.index_project(project.id).unwrap();

    let held = svc.registry().get(project.id).unwrap();
    svc.delete_project(project.id).unwrap();
    assert!(held.is_retired());
    assert!(held.add_vectors(&["late".to_string()], &[1]).is_err());
    assert!(!data.path().join(format!("project_{}", project.id)).exists());
    assert!(matches!(
        svc.registry().get(project.id),
        Err(IndexError::NotFound { .. })
    ));
}

#[test]
fn test_scan_failure_is_reported_with_its_path() {
    let data = tempfile::tempdir().unwrap();
    let svc = service(Config::default(), data.path());
    let project = svc.create_project("ghost", "nowhere").unwrap();
    let missing = data.path().join("does-not-exist");

    let err = semdex_pipeline::ingest_dir(
        svc.catalog(),
        project.id,
        &missing,
        &svc.config().core,
    )
    .unwrap_err();
    assert!(matches!(&err, IndexError::Scan { path, .. } if path == &missing));
    assert!(err.to_string().starts_with("cannot scan "));
}
