pub mod store;

pub use store::{CheckpointStore, NewCheckpoint};
