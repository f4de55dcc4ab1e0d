// File scanner for project ingestion
use crate::models::WalkedFile;
use anyhow::Result;
use ignore::WalkBuilder;
use semdex_config::CoreConfig;
use std::path::Path;
use tracing::{debug, warn};

/// Walk `root` depth-first and return every allowed file as text.
///
/// Directories named in `config.ignore_dirs` are not descended into and
/// files whose extension is not in `config.include_extensions` are skipped.
/// Invalid UTF-8 is replaced rather than rejected. Entries are visited in
/// file-name order so the result is stable across runs.
pub fn walk(root: &Path, config: &CoreConfig) -> Result<Vec<WalkedFile>> {
    if !root.is_dir() {
        anyhow::bail!("{} is not a directory", root.display());
    }

    let filter_config = config.clone();
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().map_or(false, |ft| ft.is_dir());
            if entry.depth() == 0 || !is_dir {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !filter_config.is_ignored_dir(&name)
        })
        .build();

    let mut files = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Error scanning path: {}", err);
                continue;
            }
        };
        if !entry.file_type().map_or(false, |ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let allowed = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| config.allows_extension(ext));
        if !allowed {
            continue;
        }

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("Skipping unreadable file {}: {}", path.display(), err);
                continue;
            }
        };

        let rel_path = path.strip_prefix(root).unwrap_or(path);
        let relative_path = rel_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        files.push(WalkedFile {
            relative_path,
            text: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }

    debug!("Scanned {} files under {}", files.len(), root.display());
    Ok(files)
}
