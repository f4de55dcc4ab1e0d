//! Binary layout of the two per-project index objects.
//!
//! Both start with a fixed header, all integers little-endian:
//!
//! ```text
//! magic[4] | version u16 | dimension u32 | count u64
//! ```
//!
//! `vectors.bin` (magic `SDXV`) is followed by `count * dimension` f32 values,
//! row-major. `id_map.bin` (magic `SDXM`) is followed by `count` pairs of
//! `(vector_id u64, chunk_id u64)`.

use semdex_core::models::{ChunkId, VectorId};
use semdex_store::StoreError;

pub const VECTORS_OBJECT: &str = "vectors.bin";
pub const ID_MAP_OBJECT: &str = "id_map.bin";

pub const VECTORS_MAGIC: [u8; 4] = *b"SDXV";
pub const ID_MAP_MAGIC: [u8; 4] = *b"SDXM";
pub const FORMAT_VERSION: u16 = 1;

pub const HEADER_LEN: usize = 4 + 2 + 4 + 8;
const COUNT_OFFSET: usize = 10;
const PAIR_LEN: usize = 16;

fn write_header(buf: &mut Vec<u8>, magic: [u8; 4], dimension: usize, count: u64) {
    buf.extend_from_slice(&magic);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&(dimension as u32).to_le_bytes());
    buf.extend_from_slice(&count.to_le_bytes());
}

/// Encode row-major vectors given as consecutive slices (e.g. existing rows, then new rows).
pub fn encode_vectors(dimension: usize, parts: &[&[f32]]) -> Vec<u8> {
    let values: usize = parts.iter().map(|p| p.len()).sum();
    let count = if dimension == 0 { 0 } else { values / dimension };
    let mut buf = Vec::with_capacity(HEADER_LEN + values * 4);
    write_header(&mut buf, VECTORS_MAGIC, dimension, count as u64);
    for part in parts {
        for value in part.iter() {
            buf.extend_from_slice(&value.to_le_bytes());
        }
    }
    buf
}

pub fn encode_id_map<I>(dimension: usize, pairs: I) -> Vec<u8>
where
    I: IntoIterator<Item = (VectorId, ChunkId)>,
{
    let mut buf = Vec::new();
    write_header(&mut buf, ID_MAP_MAGIC, dimension, 0);
    let mut count: u64 = 0;
    for (vector_id, chunk_id) in pairs {
        buf.extend_from_slice(&vector_id.to_le_bytes());
        buf.extend_from_slice(&chunk_id.to_le_bytes());
        count += 1;
    }
    buf[COUNT_OFFSET..HEADER_LEN].copy_from_slice(&count.to_le_bytes());
    buf
}

/// Returns the flat value buffer; its length is `count * expected_dimension`.
pub fn decode_vectors(bytes: &[u8], expected_dimension: usize) -> Result<Vec<f32>, StoreError> {
    let count = read_header(VECTORS_OBJECT, bytes, VECTORS_MAGIC, expected_dimension)?;
    let body = &bytes[HEADER_LEN..];
    let expected_len = (count as usize)
        .checked_mul(expected_dimension)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| corrupt(VECTORS_OBJECT, format!("count {} overflows", count)))?;
    if body.len() != expected_len {
        return Err(corrupt(
            VECTORS_OBJECT,
            format!("expected {} body bytes, found {}", expected_len, body.len()),
        ));
    }
    Ok(body
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

pub fn decode_id_map(
    bytes: &[u8],
    expected_dimension: usize,
) -> Result<Vec<(VectorId, ChunkId)>, StoreError> {
    let count = read_header(ID_MAP_OBJECT, bytes, ID_MAP_MAGIC, expected_dimension)?;
    let body = &bytes[HEADER_LEN..];
    let expected_len = (count as usize)
        .checked_mul(PAIR_LEN)
        .ok_or_else(|| corrupt(ID_MAP_OBJECT, format!("count {} overflows", count)))?;
    if body.len() != expected_len {
        return Err(corrupt(
            ID_MAP_OBJECT,
            format!("expected {} body bytes, found {}", expected_len, body.len()),
        ));
    }
    Ok(body
        .chunks_exact(PAIR_LEN)
        .map(|pair| (read_u64(&pair[..8]), read_u64(&pair[8..])))
        .collect())
}

fn read_header(
    name: &str,
    bytes: &[u8],
    magic: [u8; 4],
    expected_dimension: usize,
) -> Result<u64, StoreError> {
    if bytes.len() < HEADER_LEN {
        return Err(corrupt(name, format!("truncated header ({} bytes)", bytes.len())));
    }
    if bytes[..4] != magic {
        return Err(corrupt(name, "bad magic".to_string()));
    }
    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != FORMAT_VERSION {
        return Err(corrupt(name, format!("unsupported version {}", version)));
    }
    let dimension = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]) as usize;
    if dimension != expected_dimension {
        return Err(corrupt(
            name,
            format!(
                "dimension {} does not match index dimension {}",
                dimension, expected_dimension
            ),
        ));
    }
    Ok(read_u64(&bytes[COUNT_OFFSET..HEADER_LEN]))
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(raw)
}

fn corrupt(name: &str, reason: String) -> StoreError {
    StoreError::Corrupt {
        name: name.to_string(),
        reason,
    }
}
