pub mod codec;
pub mod error;
pub mod registry;
pub mod vector;

pub use error::{IndexError, Result};
pub use registry::IndexRegistry;
pub use vector::{SearchHit, VectorIndex};
