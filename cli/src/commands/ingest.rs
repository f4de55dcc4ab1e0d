use super::context::open_service;
use super::ui;
use anyhow::{Context, Result};
use std::path::Path;

pub fn handle_ingest(
    config_path: Option<&Path>,
    dir: &Path,
    name: Option<String>,
    index: bool,
) -> Result<()> {
    let service = open_service(config_path)?;
    let root = dir
        .canonicalize()
        .with_context(|| format!("cannot resolve {}", dir.display()))?;
    let name = name.unwrap_or_else(|| {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string())
    });

    let (project, files) = service.create_project_from_dir(&name, &root)?;
    ui::print_success(&format!(
        "Created project '{}' (id {}) with {} files",
        project.name, project.id, files
    ));

    if index {
        let report = service.index_project(project.id)?;
        ui::print_success(&format!(
            "Indexed {} chunks from {} files",
            report.chunks, report.files
        ));
    }
    Ok(())
}
