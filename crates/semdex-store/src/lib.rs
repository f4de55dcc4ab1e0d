pub mod blob_store;
pub mod catalog;
pub mod chunk_store;
pub mod error;
pub mod file_store;
pub mod project_store;
pub mod storage;
pub mod vector_store;

pub use blob_store::{FsIndexStore, IndexStore, SledIndexStore};
pub use catalog::Catalog;
pub use error::{Result, StoreError};
pub use storage::{Store, Tree};
