use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A scalar payload value. Vector store payloads are flat maps of these —
/// no nested documents, so every filter is an exact-match predicate on a
/// single payload field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<&str> for PayloadValue {
    fn from(value: &str) -> Self {
        PayloadValue::String(value.to_string())
    }
}

impl From<String> for PayloadValue {
    fn from(value: String) -> Self {
        PayloadValue::String(value)
    }
}

pub type Payload = HashMap<String, PayloadValue>;

/// A single document in a named vector store collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub collection: String,
    pub payload: Payload,
    pub embedding: Vec<f32>,
}

/// A scored search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f64,
}

/// A conjunction of exact-match predicates on payload fields.
pub type Filter = HashMap<String, PayloadValue>;

/// Reserved payload field names the Tenant Guard injects/enforces. No
/// caller-supplied filter or payload may set these directly — only the
/// guard may.
pub const RESERVED_FIELDS: [&str; 3] = ["tenant_id", "project_id", "scope"];
