//! # substrate-core
//!
//! Foundation crate for the knowledge substrate: shared entity types,
//! errors, ambient request scope, config, and constants. Every other
//! crate in the workspace depends on this one.

pub mod checkpoint;
pub mod compression;
pub mod config;
pub mod constants;
pub mod document;
pub mod errors;
pub mod memory;
pub mod scope;

pub use checkpoint::{Checkpoint, ResumeLevel, ResumedCheckpoint};
pub use compression::{Algorithm, CompressionLevel, CompressionMetadata, CompressionResult};
pub use config::SubstrateConfig;
pub use document::{Document, Filter, Payload, PayloadValue, ScoredDocument, RESERVED_FIELDS};
pub use errors::{SubstrateError, SubstrateResult};
pub use memory::{FeedbackCounters, Memory, OutcomeCounters};
pub use scope::{RequestContext, RequestScope, ScopeLevel};
