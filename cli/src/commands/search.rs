use super::context::{open_service, resolve_project};
use super::ui;
use anyhow::Result;
use std::path::Path;

pub fn handle_search(
    config_path: Option<&Path>,
    project: &str,
    query: &str,
    top: Option<usize>,
    json: bool,
) -> Result<()> {
    let service = open_service(config_path)?;
    let project_id = resolve_project(&service, project)?;
    let results = service.retrieve(project_id, query, top)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    ui::print_header(&format!("Searching project {} for: {}", project_id, query));
    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }
    for (i, hit) in results.iter().enumerate() {
        ui::print_search_match(
            i + 1,
            &hit.file_path,
            hit.start_line,
            hit.end_line,
            hit.score,
            &hit.text,
        );
    }
    Ok(())
}
