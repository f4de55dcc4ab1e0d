//! Configuration merging logic
//!
//! Merges configurations from multiple sources with proper precedence.

use crate::{types::*, Config};

/// Merge two configurations, with `overlay` taking precedence
///
/// Fields of `overlay` that still hold their default value do not
/// override `base`.
pub fn merge(mut base: Config, overlay: Config) -> Config {
    base.core = merge_core(base.core, overlay.core);
    base.chunking = merge_chunking(base.chunking, overlay.chunking);
    base.embedding = merge_embedding(base.embedding, overlay.embedding);
    base.search = merge_search(base.search, overlay.search);
    base
}

fn pick<T: PartialEq>(base: T, overlay: T, default: T) -> T {
    if overlay != default {
        overlay
    } else {
        base
    }
}

fn merge_core(base: CoreConfig, overlay: CoreConfig) -> CoreConfig {
    let default = CoreConfig::default();
    CoreConfig {
        data_dir: pick(base.data_dir, overlay.data_dir, default.data_dir),
        include_extensions: pick(
            base.include_extensions,
            overlay.include_extensions,
            default.include_extensions,
        ),
        ignore_dirs: pick(base.ignore_dirs, overlay.ignore_dirs, default.ignore_dirs),
        index_backend: pick(base.index_backend, overlay.index_backend, default.index_backend),
    }
}

fn merge_chunking(base: ChunkingConfig, overlay: ChunkingConfig) -> ChunkingConfig {
    let default = ChunkingConfig::default();
    ChunkingConfig {
        max_lines: pick(base.max_lines, overlay.max_lines, default.max_lines),
        overlap_lines: pick(base.overlap_lines, overlay.overlap_lines, default.overlap_lines),
    }
}

fn merge_embedding(base: EmbeddingConfig, overlay: EmbeddingConfig) -> EmbeddingConfig {
    let default = EmbeddingConfig::default();
    EmbeddingConfig {
        backend: pick(base.backend, overlay.backend, default.backend),
        model_name: pick(base.model_name, overlay.model_name, default.model_name),
        dimension: pick(base.dimension, overlay.dimension, default.dimension),
        api_base: pick(base.api_base, overlay.api_base, default.api_base),
    }
}

fn merge_search(base: SearchConfig, overlay: SearchConfig) -> SearchConfig {
    let default = SearchConfig::default();
    SearchConfig {
        top_k: pick(base.top_k, overlay.top_k, default.top_k),
    }
}
