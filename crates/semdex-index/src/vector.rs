use crate::codec::{self, ID_MAP_OBJECT, VECTORS_OBJECT};
use crate::error::{IndexError, Result};
use rayon::prelude::*;
use semdex_core::models::{ChunkId, ProjectId, VectorId};
use semdex_core::traits::Embedder;
use semdex_store::IndexStore;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub chunk_id: ChunkId,
    /// Squared Euclidean distance to the query vector.
    pub distance: f32,
}

#[derive(Debug, Clone, Default)]
struct IndexState {
    /// Row-major; row `i` is the vector with id `i`.
    vectors: Vec<f32>,
    id_map: BTreeMap<VectorId, ChunkId>,
    next_id: VectorId,
}

/// Exhaustive in-memory vector index for one project, persisted through an [`IndexStore`].
///
/// Writers (`add_vectors`, `persist`) are serialized by a per-index mutex.
/// Once [`VectorIndex::retire`] has run, every later write fails, so a
/// deleted project's objects are never written again. Readers clone the current snapshot and scan it without holding any lock,
/// so a query running next to an add sees either the old or the new rows,
/// never a partial append.
pub struct VectorIndex {
    project_id: ProjectId,
    dimension: usize,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn IndexStore>,
    /// Guards writes; the flag is set once the index is retired.
    writer: Mutex<bool>,
    state: RwLock<Arc<IndexState>>,
}

impl VectorIndex {
    /// Load the project's index from `store`, or start empty when either object is absent.
    pub fn load(
        project_id: ProjectId,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn IndexStore>,
    ) -> Result<Self> {
        let dimension = embedder.dimension();
        if dimension == 0 || u32::try_from(dimension).is_err() {
            return Err(IndexError::Validation(format!(
                "unsupported embedding dimension {}",
                dimension
            )));
        }

        let vectors = store.get(project_id, VECTORS_OBJECT)?;
        let id_map = store.get(project_id, ID_MAP_OBJECT)?;
        let state = match (vectors, id_map) {
            (Some(vectors), Some(id_map)) => decode_state(&vectors, &id_map, dimension)?,
            _ => {
                debug!("no persisted index for project {}, starting empty", project_id);
                IndexState::default()
            }
        };
        debug!(
            "loaded index for project {}: {} vectors, next id {}",
            project_id,
            state.id_map.len(),
            state.next_id
        );

        Ok(Self {
            project_id,
            dimension,
            embedder,
            store,
            writer: Mutex::new(false),
            state: RwLock::new(Arc::new(state)),
        })
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.snapshot().vectors.len() / self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn id_map(&self) -> BTreeMap<VectorId, ChunkId> {
        self.snapshot().id_map.clone()
    }

    /// Embed `texts`, append them, persist, and return their new vector ids in input order.
    ///
    /// Ids continue from the current count. The durable objects are written
    /// before the new rows become visible, so any failure leaves the index as
    /// it was.
    pub fn add_vectors(&self, texts: &[String], chunk_ids: &[ChunkId]) -> Result<Vec<VectorId>> {
        if texts.len() != chunk_ids.len() {
            return Err(IndexError::Validation(format!(
                "got {} texts but {} chunk ids",
                texts.len(),
                chunk_ids.len()
            )));
        }

        let writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        self.ensure_live(*writer)?;
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = self.embedder.embed(texts).map_err(IndexError::Provider)?;
        self.check_batch(&embeddings, texts.len())?;
        let rows: Vec<f32> = embeddings.into_iter().flatten().collect();

        let current = self.snapshot();
        let start = current.next_id;
        let ids: Vec<VectorId> = (start..start + texts.len() as u64).collect();
        let new_pairs = ids.iter().copied().zip(chunk_ids.iter().copied());

        let vectors_blob = codec::encode_vectors(
            self.dimension,
            &[current.vectors.as_slice(), rows.as_slice()],
        );
        let id_map_blob = codec::encode_id_map(
            self.dimension,
            current
                .id_map
                .iter()
                .map(|(v, c)| (*v, *c))
                .chain(new_pairs.clone()),
        );
        drop(current);
        self.write_objects(&vectors_blob, &id_map_blob)?;

        {
            let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let state = Arc::make_mut(&mut guard);
            state.vectors.extend_from_slice(&rows);
            state.id_map.extend(new_pairs);
            state.next_id = start + ids.len() as u64;
        }

        debug!(
            "project {}: assigned vector ids {}..{}",
            self.project_id,
            start,
            start + ids.len() as u64
        );
        Ok(ids)
    }

    /// Up to `k` nearest chunks by squared Euclidean distance, closest first.
    ///
    /// Equal distances keep vector-id order. Rows without an id-map entry are skipped.
    pub fn query(&self, text: &str, k: usize) -> Result<Vec<SearchHit>> {
        let probe = self.embedder.embed_one(text).map_err(IndexError::Provider)?;
        if probe.len() != self.dimension {
            return Err(IndexError::Provider(anyhow::anyhow!(
                "query embedding has dimension {}, index expects {}",
                probe.len(),
                self.dimension
            )));
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let snapshot = self.snapshot();
        let mut scored: Vec<(VectorId, f32)> = snapshot
            .vectors
            .par_chunks_exact(self.dimension)
            .enumerate()
            .map(|(row, vector)| (row as VectorId, squared_l2(vector, &probe)))
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));

        let hits: Vec<SearchHit> = scored
            .into_iter()
            .filter_map(|(vector_id, distance)| match snapshot.id_map.get(&vector_id) {
                Some(&chunk_id) => Some(SearchHit { chunk_id, distance }),
                None => {
                    warn!(
                        "project {}: vector {} has no chunk mapping, skipping",
                        self.project_id, vector_id
                    );
                    None
                }
            })
            .take(k)
            .collect();
        debug!("project {}: query returned {} hits", self.project_id, hits.len());
        Ok(hits)
    }

    /// Write the current state to the store.
    pub fn persist(&self) -> Result<()> {
        let writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        self.ensure_live(*writer)?;
        let current = self.snapshot();
        let vectors_blob = codec::encode_vectors(self.dimension, &[current.vectors.as_slice()]);
        let id_map_blob = codec::encode_id_map(
            self.dimension,
            current.id_map.iter().map(|(v, c)| (*v, *c)),
        );
        self.write_objects(&vectors_blob, &id_map_blob)
    }

    /// Refuse all further writes. Waits for an in-flight `add_vectors` or `persist` to finish.
    pub fn retire(&self) {
        *self.writer.lock().unwrap_or_else(PoisonError::into_inner) = true;
        debug!("project {}: index retired", self.project_id);
    }

    pub fn is_retired(&self) -> bool {
        *self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_live(&self, retired: bool) -> Result<()> {
        if retired {
            return Err(IndexError::NotFound {
                kind: "project",
                id: self.project_id,
            });
        }
        Ok(())
    }

    fn write_objects(&self, vectors_blob: &[u8], id_map_blob: &[u8]) -> Result<()> {
        self.store.put(self.project_id, VECTORS_OBJECT, vectors_blob)?;
        self.store.put(self.project_id, ID_MAP_OBJECT, id_map_blob)?;
        Ok(())
    }

    fn snapshot(&self) -> Arc<IndexState> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn check_batch(&self, embeddings: &[Vec<f32>], expected: usize) -> Result<()> {
        if embeddings.len() != expected {
            return Err(IndexError::Provider(anyhow::anyhow!(
                "provider returned {} embeddings for {} texts",
                embeddings.len(),
                expected
            )));
        }
        if let Some(bad) = embeddings.iter().find(|e| e.len() != self.dimension) {
            return Err(IndexError::Provider(anyhow::anyhow!(
                "provider returned a {}-dimensional embedding, index expects {}",
                bad.len(),
                self.dimension
            )));
        }
        Ok(())
    }
}

fn decode_state(vectors: &[u8], id_map: &[u8], dimension: usize) -> Result<IndexState> {
    let vectors = codec::decode_vectors(vectors, dimension)?;
    let pairs = codec::decode_id_map(id_map, dimension)?;
    let rows = vectors.len() / dimension;
    if pairs.len() != rows {
        return Err(semdex_store::StoreError::Corrupt {
            name: ID_MAP_OBJECT.to_string(),
            reason: format!("{} id-map entries for {} vectors", pairs.len(), rows),
        }
        .into());
    }
    let id_map: BTreeMap<VectorId, ChunkId> = pairs.into_iter().collect();
    // Row `i` is vector `i`, so the keys must be exactly 0..rows.
    let next_id = id_map.keys().next_back().map_or(0, |max| max + 1);
    if id_map.len() != rows || next_id != rows as VectorId {
        return Err(semdex_store::StoreError::Corrupt {
            name: ID_MAP_OBJECT.to_string(),
            reason: format!("vector ids are not exactly 0..{}", rows),
        }
        .into());
    }
    Ok(IndexState {
        vectors,
        id_map,
        next_id,
    })
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
