use semdex_config::CoreConfig;
use semdex_core::models::{FileRecord, ProjectId, WalkedFile};
use semdex_core::scanner;
use semdex_index::{IndexError, Result};
use semdex_store::Catalog;
use std::path::Path;
use tracing::info;

/// Persist one FileRecord per walked file, in walk order.
pub fn ingest_files(
    catalog: &Catalog,
    project_id: ProjectId,
    files: &[WalkedFile],
) -> Result<Vec<FileRecord>> {
    let mut records = Vec::with_capacity(files.len());
    for file in files {
        records.push(catalog.add_file(project_id, &file.relative_path, &file.text)?);
    }
    Ok(records)
}

/// Walk `root` with the configured filters and ingest every accepted file.
pub fn ingest_dir(
    catalog: &Catalog,
    project_id: ProjectId,
    root: &Path,
    config: &CoreConfig,
) -> Result<Vec<FileRecord>> {
    let files = scanner::walk(root, config).map_err(|cause| IndexError::Scan {
        path: root.to_path_buf(),
        cause,
    })?;
    let records = ingest_files(catalog, project_id, &files)?;
    info!(
        "ingested {} files from {} into project {}",
        records.len(),
        root.display(),
        project_id
    );
    Ok(records)
}
