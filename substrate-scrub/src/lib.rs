//! # substrate-scrub
//!
//! Secret-pattern scrubbing (component C1). Applied at every output
//! boundary and to any input submitted to an external summarization
//! provider.

pub mod engine;
pub mod patterns;

pub use engine::Scrubber;
