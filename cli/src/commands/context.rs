use anyhow::{anyhow, bail, Context, Result};
use semdex_config::Config;
use semdex_core::models::ProjectId;
use semdex_pipeline::SearchService;
use std::path::Path;

pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = match config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

pub fn open_service(config_path: Option<&Path>) -> Result<SearchService> {
    let config = load_config(config_path)?;
    let data_dir = config.core.data_dir.clone();
    SearchService::open(config)
        .with_context(|| format!("failed to open data directory {}", data_dir.display()))
}

/// Accept either a numeric project id or a unique project name.
pub fn resolve_project(service: &SearchService, project: &str) -> Result<ProjectId> {
    if let Ok(id) = project.parse::<ProjectId>() {
        return Ok(id);
    }
    let matches: Vec<ProjectId> = service
        .list_projects()?
        .into_iter()
        .filter(|p| p.name == project)
        .map(|p| p.id)
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(anyhow!("no project named '{}'", project)),
        _ => bail!(
            "{} projects are named '{}'; use the numeric id",
            matches.len(),
            project
        ),
    }
}
