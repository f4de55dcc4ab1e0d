use super::context::{open_service, resolve_project};
use super::ui;
use anyhow::Result;
use std::path::Path;

pub fn handle_status(config_path: Option<&Path>, project: &str, json: bool) -> Result<()> {
    let service = open_service(config_path)?;
    let project_id = resolve_project(&service, project)?;
    let status = service.project_status(project_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    ui::print_header(&format!("Project {}", status.project.name));
    ui::print_field("Id", status.project.id);
    ui::print_field("Source", &status.project.source);
    ui::print_field("Files", status.files);
    ui::print_field("Chunks", status.chunks);
    ui::print_field("Vector records", status.vector_records);
    ui::print_field("Indexed vectors", status.indexed_vectors);
    if status.chunks != status.vector_records {
        println!(
            "{} chunks have no vector record; an earlier indexing run did not finish",
            status.chunks.saturating_sub(status.vector_records)
        );
    }
    Ok(())
}
