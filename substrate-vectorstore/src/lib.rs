pub mod backends;
pub mod store;

pub use backends::{InMemoryVectorStore, SqliteVectorStore};
pub use store::VectorStore;
