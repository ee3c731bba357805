mod abstractive;
mod common;
mod compressor;
mod extractive;
mod hybrid;
mod summarizer;

pub use abstractive::AbstractiveCompressor;
pub use compressor::{Capabilities, Compressor};
pub use extractive::ExtractiveCompressor;
pub use hybrid::HybridCompressor;
pub use summarizer::{HttpSummarizer, Summarizer};
