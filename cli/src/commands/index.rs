use super::context::{open_service, resolve_project};
use super::ui;
use anyhow::{bail, Result};
use semdex_pipeline::JobState;
use std::path::Path;

pub fn handle_index(config_path: Option<&Path>, project: &str, background: bool) -> Result<()> {
    let service = open_service(config_path)?;
    let project_id = resolve_project(&service, project)?;

    if !background {
        let report = service.index_project(project_id)?;
        ui::print_success(&format!(
            "Indexed {} chunks from {} files into project {}",
            report.chunks, report.files, project_id
        ));
        return Ok(());
    }

    let job = service.spawn_index(project_id)?;
    println!("Started indexing job {} for project {}", job, project_id);
    // The process owns the job thread, so wait for it before exiting.
    match service.wait_job(job) {
        Some(JobState::Succeeded { indexed_chunks }) => {
            ui::print_success(&format!("Job {} indexed {} chunks", job, indexed_chunks));
            Ok(())
        }
        Some(JobState::Failed { reason }) => bail!("job {} failed: {}", job, reason),
        other => bail!("job {} ended in unexpected state {:?}", job, other),
    }
}
