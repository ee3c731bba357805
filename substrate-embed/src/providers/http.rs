use std::time::Duration;

use serde::{Deserialize, Serialize};
use substrate_core::errors::SubstrateError;
use substrate_core::{RequestContext, SubstrateResult};

use crate::provider::{validate_batch, Embedder};

#[derive(Serialize)]
struct EmbedRequest<'a> {
    texts: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Remote HTTP embedding provider. Uses `reqwest`'s blocking client, since
/// the `Embedder` trait's methods are synchronous.
pub struct HttpProvider {
    endpoint: String,
    dimension: u32,
    client: reqwest::blocking::Client,
}

impl HttpProvider {
    pub fn new(endpoint: impl Into<String>, dimension: u32, timeout: Duration) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self {
            endpoint: endpoint.into(),
            dimension,
            client,
        }
    }
}

impl Embedder for HttpProvider {
    fn embed(&self, ctx: &RequestContext, texts: &[String]) -> SubstrateResult<Vec<Vec<f32>>> {
        validate_batch(texts)?;
        ctx.check_cancelled()?;

        let response = self
            .client
            .post(&self.endpoint)
            .json(&EmbedRequest { texts })
            .send()
            .map_err(|e| SubstrateError::backend("embedder.http", e.to_string()))?;

        if !response.status().is_success() {
            return Err(SubstrateError::backend(
                "embedder.http",
                format!("remote embedder returned status {}", response.status()),
            ));
        }

        let parsed: EmbedResponse = response
            .json()
            .map_err(|e| SubstrateError::backend("embedder.http", e.to_string()))?;

        if parsed.embeddings.len() != texts.len() {
            return Err(SubstrateError::backend(
                "embedder.http",
                format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    parsed.embeddings.len()
                ),
            ));
        }

        Ok(parsed.embeddings)
    }

    fn dimension(&self) -> u32 {
        self.dimension
    }

    fn name(&self) -> &str {
        "http-remote"
    }
}
