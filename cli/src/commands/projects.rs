use super::context::{open_service, resolve_project};
use super::ui;
use anyhow::Result;
use std::path::Path;

pub fn handle_list(config_path: Option<&Path>) -> Result<()> {
    let service = open_service(config_path)?;
    let projects = service.list_projects()?;
    if projects.is_empty() {
        println!("No projects. Create one with `semdex ingest <DIR>`.");
        return Ok(());
    }
    ui::print_header("Projects");
    for project in projects {
        println!("{:>4}  {:<24} {}", project.id, project.name, project.source);
    }
    Ok(())
}

pub fn handle_delete(config_path: Option<&Path>, project: &str) -> Result<()> {
    let service = open_service(config_path)?;
    let project_id = resolve_project(&service, project)?;
    service.delete_project(project_id)?;
    ui::print_success(&format!("Deleted project {}", project_id));
    Ok(())
}
