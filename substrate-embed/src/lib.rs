pub mod cache;
pub mod provider;
pub mod providers;

pub use cache::CachingEmbedder;
pub use provider::Embedder;
pub use providers::{HttpProvider, LocalProvider};
