use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The closed set of compression algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Extractive,
    Abstractive,
    Hybrid,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Extractive, Algorithm::Abstractive, Algorithm::Hybrid];

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Extractive => "extractive",
            Algorithm::Abstractive => "abstractive",
            Algorithm::Hybrid => "hybrid",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Algorithm {
    type Err = crate::errors::SubstrateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "extractive" => Ok(Algorithm::Extractive),
            "abstractive" => Ok(Algorithm::Abstractive),
            "hybrid" => Ok(Algorithm::Hybrid),
            other => Err(crate::errors::SubstrateError::InvalidArgs(format!(
                "unknown algorithm: {other}"
            ))),
        }
    }
}

/// The detail level a compression result was produced at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionLevel {
    Folded,
    Summary,
}

/// Metadata accompanying every compression result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionMetadata {
    pub algorithm: Algorithm,
    pub level: CompressionLevel,
    pub original_size: usize,
    pub compressed_size: usize,
    pub ratio: f64,
    pub compressed_at: DateTime<Utc>,
}

/// The result of a compression operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionResult {
    pub content: String,
    pub metadata: CompressionMetadata,
    pub quality_score: f64,
    #[serde(with = "duration_millis")]
    pub processing_time: Duration,
}

impl CompressionResult {
    /// A passthrough result: content unchanged, ratio 1.0, perfect quality.
    /// `level` must match the calling compressor's contractual level
    /// (`Folded` for Extractive, `Summary` for Abstractive and Hybrid) —
    /// passthrough doesn't change what level a compressor reports at.
    pub fn unchanged(content: String, algorithm: Algorithm, level: CompressionLevel, now: DateTime<Utc>) -> Self {
        let size = content.len();
        Self {
            content,
            metadata: CompressionMetadata {
                algorithm,
                level,
                original_size: size,
                compressed_size: size,
                ratio: 1.0,
                compressed_at: now,
            },
            quality_score: 1.0,
            processing_time: Duration::ZERO,
        }
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u128(d.as_millis())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(d)?;
        Ok(Duration::from_millis(millis))
    }
}
